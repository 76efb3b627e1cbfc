// Набор возможностей хоста, определяемый один раз при старте

use serde::Serialize;

/// Какие части Telegram.WebApp реально доступны в этой версии клиента
///
/// Заполняется один раз при обнаружении хоста и больше не меняется.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostCapabilities {
    pub ready: bool,
    pub expand: bool,
    pub theming: bool,
    pub main_button: bool,
    pub back_button: bool,
    pub popup: bool,
    pub confirm: bool,
    pub haptics: bool,
    pub closing_confirmation: bool,
    pub vertical_swipes: bool,
    pub open_link: bool,
    pub open_telegram_link: bool,
    pub events: bool,
    pub cloud_storage: bool,
}

impl HostCapabilities {
    /// Все возможности (современный клиент Telegram)
    pub fn all() -> Self {
        Self {
            ready: true,
            expand: true,
            theming: true,
            main_button: true,
            back_button: true,
            popup: true,
            confirm: true,
            haptics: true,
            closing_confirmation: true,
            vertical_swipes: true,
            open_link: true,
            open_telegram_link: true,
            events: true,
            cloud_storage: true,
        }
    }

    /// Собрать набор по функции проверки члена: `has("showPopup")` и т.п.
    ///
    /// Имена соответствуют членам `Telegram.WebApp`.
    pub fn detect(mut has: impl FnMut(&str) -> bool) -> Self {
        Self {
            ready: has("ready"),
            expand: has("expand"),
            theming: has("setHeaderColor") && has("setBackgroundColor"),
            main_button: has("MainButton"),
            back_button: has("BackButton"),
            popup: has("showPopup"),
            confirm: has("showConfirm"),
            haptics: has("HapticFeedback"),
            closing_confirmation: has("enableClosingConfirmation"),
            vertical_swipes: has("disableVerticalSwipes"),
            open_link: has("openLink"),
            open_telegram_link: has("openTelegramLink"),
            events: has("onEvent"),
            cloud_storage: has("CloudStorage"),
        }
    }
}
