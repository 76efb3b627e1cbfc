// Хост: Telegram Mini App (window.Telegram.WebApp)
//
// HostApi описывает типизированную поверхность хоста. Реализация для браузера
// лежит в wasm::telegram, в тестах используется фейк.

pub mod capabilities;
pub mod theme;
pub mod viewport;

use serde::Serialize;

use crate::utils::error::Result;

pub use capabilities::HostCapabilities;
pub use theme::{MainButtonParams, ThemeParams, ThemePlan};
pub use viewport::{SafeAreaInsets, ViewportState};

/// Стиль impact-вибрации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

/// Тип notification-вибрации
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
    Warning,
}

/// Тактильная обратная связь (`HapticFeedback`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Impact(ImpactStyle),
    Notification(NotificationKind),
    Selection,
}

impl ImpactStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
            ImpactStyle::Heavy => "heavy",
            ImpactStyle::Rigid => "rigid",
            ImpactStyle::Soft => "soft",
        }
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Error => "error",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
        }
    }
}

/// Тип кнопки popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupButtonKind {
    Default,
    Ok,
    Close,
    Cancel,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupButton {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PopupButtonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Параметры `showPopup`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    pub buttons: Vec<PopupButton>,
}

/// События хоста, на которые подписывается адаптер
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    ThemeChanged,
    ViewportChanged,
    Activated,
    Deactivated,
    MainButtonClicked,
    BackButtonClicked,
}

impl HostEventKind {
    /// Имя события для `Telegram.WebApp.onEvent`
    pub fn name(&self) -> &'static str {
        match self {
            HostEventKind::ThemeChanged => "themeChanged",
            HostEventKind::ViewportChanged => "viewportChanged",
            HostEventKind::Activated => "activated",
            HostEventKind::Deactivated => "deactivated",
            HostEventKind::MainButtonClicked => "mainButtonClicked",
            HostEventKind::BackButtonClicked => "backButtonClicked",
        }
    }
}

/// Событие хоста вместе с полезной нагрузкой
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ThemeChanged,
    ViewportChanged(ViewportState),
    VisibilityChanged { visible: bool },
    MainButtonClicked,
    BackButtonClicked,
}

/// Информация о клиенте Telegram
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    pub version: Option<String>,
    pub platform: Option<String>,
    pub color_scheme: Option<String>,
}

/// Типизированная поверхность хоста
///
/// Любой метод может вернуть `SiteError::CapabilityUnavailable`, если член
/// отсутствует, или `SiteError::HostCallError`, если вызов бросил исключение.
/// Колбэчные API превращены в async: ровно одно завершение на вызов.
#[allow(async_fn_in_trait)]
pub trait HostApi {
    fn capabilities(&self) -> HostCapabilities;

    fn info(&self) -> HostInfo;

    fn ready(&self) -> Result<()>;
    fn expand(&self) -> Result<()>;

    fn theme_params(&self) -> Result<ThemeParams>;
    fn set_header_color(&self, color: &str) -> Result<()>;
    fn set_background_color(&self, color: &str) -> Result<()>;

    fn viewport(&self) -> Result<ViewportState>;

    fn enable_closing_confirmation(&self) -> Result<()>;
    fn disable_vertical_swipes(&self) -> Result<()>;

    fn configure_main_button(&self, params: &MainButtonParams) -> Result<()>;
    fn show_main_button(&self) -> Result<()>;
    fn hide_back_button(&self) -> Result<()>;

    /// Подписка на событие. Обработчик может вызываться многократно.
    fn subscribe(&self, kind: HostEventKind, handler: Box<dyn FnMut(HostEvent)>) -> Result<()>;

    fn haptic(&self, feedback: Haptic) -> Result<()>;

    /// Возвращает id нажатой кнопки (`None`, если popup закрыт без выбора)
    async fn show_popup(&self, params: &PopupParams) -> Result<Option<String>>;
    async fn show_confirm(&self, message: &str) -> Result<bool>;

    fn open_link(&self, url: &str) -> Result<()>;
    fn open_telegram_link(&self, url: &str) -> Result<()>;

    async fn cloud_get(&self, key: &str) -> Result<Option<String>>;
    async fn cloud_set(&self, key: &str, value: &str) -> Result<bool>;
}

/// Результат однократного обнаружения хоста
pub enum HostEnvironment<H> {
    Present(H),
    Absent,
}

impl<H: HostApi> HostEnvironment<H> {
    pub fn from_option(host: Option<H>) -> Self {
        match host {
            Some(host) => HostEnvironment::Present(host),
            None => HostEnvironment::Absent,
        }
    }

    pub fn host(&self) -> Option<&H> {
        match self {
            HostEnvironment::Present(host) => Some(host),
            HostEnvironment::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HostEnvironment::Present(_))
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.host()
            .map(|host| host.capabilities())
            .unwrap_or_default()
    }
}
