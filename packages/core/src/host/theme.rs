// Тема Telegram: цвета заголовка, фона, MainButton и CSS-переменные

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::utils::validation::validate_hex_color;

/// `Telegram.WebApp.themeParams` (все поля опциональны)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThemeParams {
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub hint_color: Option<String>,
    pub link_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
    pub secondary_bg_color: Option<String>,
}

/// Параметры нативной кнопки (`MainButton.setParams`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainButtonParams {
    pub text: String,
    pub color: String,
    pub text_color: String,
}

/// Что нужно применить к хосту и странице для текущей темы
#[derive(Debug, Clone, PartialEq)]
pub struct ThemePlan {
    pub header_color: String,
    pub background_color: String,
    pub css_variables: Vec<(&'static str, String)>,
    pub main_button: MainButtonParams,
}

fn valid(color: &Option<String>) -> Option<&str> {
    color
        .as_deref()
        .filter(|c| validate_hex_color(c).is_ok())
}

impl ThemePlan {
    pub fn new(params: &ThemeParams, config: &Config) -> Self {
        let bg = valid(&params.bg_color);

        let css_variables = [
            ("--tg-theme-text-color", &params.text_color),
            ("--tg-theme-hint-color", &params.hint_color),
            ("--tg-theme-link-color", &params.link_color),
            ("--tg-theme-button-color", &params.button_color),
            ("--tg-theme-button-text-color", &params.button_text_color),
            ("--tg-theme-secondary-bg-color", &params.secondary_bg_color),
        ]
        .into_iter()
        .filter_map(|(name, value)| valid(value).map(|v| (name, v.to_string())))
        .collect();

        Self {
            header_color: bg.unwrap_or(&config.default_header_color).to_string(),
            background_color: bg.unwrap_or(&config.default_background_color).to_string(),
            css_variables,
            main_button: MainButtonParams {
                text: config.contact_button_text.clone(),
                color: valid(&params.button_color)
                    .unwrap_or(&config.default_button_color)
                    .to_string(),
                text_color: valid(&params.button_text_color)
                    .unwrap_or(&config.default_button_text_color)
                    .to_string(),
            },
        }
    }
}
