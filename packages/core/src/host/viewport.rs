// Viewport и safe area insets Telegram

use serde::{Deserialize, Serialize};

/// Отступы безопасной зоны (`safeAreaInsets` / `contentSafeAreaInsets`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SafeAreaInsets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Снимок viewport хоста
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportState {
    pub viewport_height: f64,
    pub viewport_stable_height: f64,
    pub is_expanded: bool,
    pub is_state_stable: bool,
    /// Отступы контента с учётом шапки и подвала Telegram (новые клиенты)
    pub content_safe_area_insets: Option<SafeAreaInsets>,
    /// Отступы устройства
    pub safe_area_insets: Option<SafeAreaInsets>,
}

impl ViewportState {
    /// Нижний отступ: contentSafeAreaInsets, иначе safeAreaInsets, иначе 0
    pub fn bottom_inset(&self) -> f64 {
        self.content_safe_area_insets
            .or(self.safe_area_insets)
            .map(|insets| insets.bottom)
            .unwrap_or(0.0)
    }

    /// Верхний отступ по тем же правилам
    pub fn top_inset(&self) -> f64 {
        self.content_safe_area_insets
            .or(self.safe_area_insets)
            .map(|insets| insets.top)
            .unwrap_or(0.0)
    }

    /// CSS-переменные раскладки для `document.documentElement`
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            ("--tg-safe-area-inset-top", px(self.top_inset())),
            ("--tg-safe-area-inset-bottom", px(self.bottom_inset())),
        ];
        if self.viewport_height > 0.0 {
            vars.push(("--tg-viewport-height", px(self.viewport_height)));
        }
        if self.viewport_stable_height > 0.0 {
            vars.push(("--tg-viewport-stable-height", px(self.viewport_stable_height)));
        }
        vars
    }
}

fn px(value: f64) -> String {
    format!("{}px", value.max(0.0).round())
}
