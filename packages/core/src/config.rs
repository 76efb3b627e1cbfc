//! Централизованная конфигурация клиентской части сайта-визитки
//!
//! Все константы (контакты, тайминги, селекторы, цвета по умолчанию)
//! определены здесь, чтобы избежать хардкода по всему проекту.

use serde::Deserialize;
use std::sync::OnceLock;

use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{validate_hex_color, validate_telegram_username};

/// Глобальная конфигурация приложения (синглтон)
static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// Основная структура конфигурации
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ============================================
    // СЛАЙДЕРЫ
    // ============================================

    /// Период автоматической смены слайдов (в миллисекундах)
    pub slide_interval_ms: u32,

    /// Задержка перед скрытием предыдущего слайда при cross-fade (в миллисекундах)
    pub crossfade_hide_delay_ms: u32,

    /// Использовать cross-fade вместо переключения класса
    pub crossfade: bool,

    /// Останавливать автопрокрутку, пока вкладка скрыта
    pub pause_when_hidden: bool,

    // ============================================
    // КОНТАКТЫ
    // ============================================

    /// Адрес для mailto-ссылки
    pub contact_email: String,

    /// Тема письма
    pub contact_subject: String,

    /// Личный аккаунт Telegram (без @)
    pub telegram_username: String,

    // ============================================
    // ТЕКСТЫ
    // ============================================

    /// Текст нативной кнопки MainButton
    pub contact_button_text: String,

    /// Заголовок popup выбора способа связи
    pub popup_title: String,

    /// Сообщение popup выбора способа связи
    pub popup_message: String,

    /// Сообщение браузерного confirm вне Telegram
    pub browser_confirm_message: String,

    // ============================================
    // ТЕМА
    // ============================================

    /// Цвет заголовка, если тема Telegram не задаёт bg_color
    pub default_header_color: String,

    /// Цвет фона, если тема Telegram не задаёт bg_color
    pub default_background_color: String,

    /// Цвет MainButton по умолчанию
    pub default_button_color: String,

    /// Цвет текста MainButton по умолчанию
    pub default_button_text_color: String,

    // ============================================
    // ПОВЕДЕНИЕ
    // ============================================

    /// Повторные попытки показать MainButton (задержки в миллисекундах)
    pub main_button_retry_ms: Vec<u32>,

    /// Порог прокрутки, после которого MainButton показывается снова (в пикселях)
    pub scroll_show_threshold_px: f64,

    /// rootMargin для IntersectionObserver ленивых изображений
    pub lazy_root_margin: String,

    /// Длительность появления загруженного изображения (в миллисекундах)
    pub lazy_fade_ms: u32,

    // ============================================
    // СЕЛЕКТОРЫ И КЛАССЫ
    // ============================================

    pub contact_button_selector: String,
    pub hero_slide_selector: String,
    pub hero_button_selector: String,
    pub speaker_slide_selector: String,
    pub speaker_button_selector: String,
    pub lazy_image_selector: String,
    pub anchor_selector: String,
    pub active_slide_class: String,
    pub hidden_button_class: String,
    pub bottom_spacing_style_id: String,
}

impl Config {
    /// Создать конфигурацию с дефолтными значениями
    pub fn default() -> Self {
        Self {
            // Слайдеры
            slide_interval_ms: 5000,
            crossfade_hide_delay_ms: 600,
            crossfade: false,
            pause_when_hidden: true,

            // Контакты
            contact_email: "anna.anna.ivaschenko@gmail.com".to_string(),
            contact_subject: "Контакт с сайта-визитки".to_string(),
            telegram_username: "a_ivaschenko".to_string(),

            // Тексты
            contact_button_text: "Связаться".to_string(),
            popup_title: "Связаться".to_string(),
            popup_message: "Выберите способ связи:".to_string(),
            browser_confirm_message: "Написать на email?".to_string(),

            // Тема
            default_header_color: "#94d4ff".to_string(),
            default_background_color: "#ffffff".to_string(),
            default_button_color: "#94d4ff".to_string(),
            default_button_text_color: "#ffffff".to_string(),

            // Поведение
            main_button_retry_ms: vec![100, 500, 1500],
            scroll_show_threshold_px: 100.0,
            lazy_root_margin: "50px 0px".to_string(),
            lazy_fade_ms: 300,

            // Селекторы
            contact_button_selector: ".contact-button, .values-contact-button".to_string(),
            hero_slide_selector: ".hero-slide".to_string(),
            hero_button_selector: ".hero-slider__button".to_string(),
            speaker_slide_selector: ".speaker-slide".to_string(),
            speaker_button_selector: ".speaker-slider__button".to_string(),
            lazy_image_selector: "img[data-src]".to_string(),
            anchor_selector: "a[href^=\"#\"]".to_string(),
            active_slide_class: "is-active".to_string(),
            hidden_button_class: "tg-hidden-button".to_string(),
            bottom_spacing_style_id: "telegram-bottom-spacing-fix".to_string(),
        }
    }

    /// Применить частичные переопределения (например, переданные из JS)
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(val) = overrides.slide_interval_ms {
            self.slide_interval_ms = val;
        }
        if let Some(val) = overrides.crossfade_hide_delay_ms {
            self.crossfade_hide_delay_ms = val;
        }
        if let Some(val) = overrides.crossfade {
            self.crossfade = val;
        }
        if let Some(val) = overrides.pause_when_hidden {
            self.pause_when_hidden = val;
        }
        if let Some(val) = overrides.contact_email {
            self.contact_email = val;
        }
        if let Some(val) = overrides.contact_subject {
            self.contact_subject = val;
        }
        if let Some(val) = overrides.telegram_username {
            self.telegram_username = val.trim_start_matches('@').to_string();
        }
        if let Some(val) = overrides.main_button_retry_ms {
            self.main_button_retry_ms = val;
        }
        if let Some(val) = overrides.lazy_root_margin {
            self.lazy_root_margin = val;
        }
        self
    }

    /// Проверить значения, которые могли прийти извне
    ///
    /// # Errors
    ///
    /// `SiteError::ConfigError` с описанием первого некорректного поля
    pub fn validate(&self) -> Result<()> {
        if self.slide_interval_ms == 0 {
            return Err(SiteError::ConfigError("slideIntervalMs must be positive".to_string()));
        }
        if !self.contact_email.contains('@') {
            return Err(SiteError::ConfigError(format!("Invalid email: {}", self.contact_email)));
        }
        validate_telegram_username(&self.telegram_username)
            .map_err(|e| SiteError::ConfigError(e.to_string()))?;
        for color in [
            &self.default_header_color,
            &self.default_background_color,
            &self.default_button_color,
            &self.default_button_text_color,
        ] {
            validate_hex_color(color).map_err(|e| SiteError::ConfigError(e.to_string()))?;
        }
        Ok(())
    }

    /// Получить глобальный экземпляр конфигурации
    ///
    /// Автоматически инициализирует конфигурацию со значениями по умолчанию при первом вызове
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(Config::default)
    }
}

/// Частичная конфигурация: все поля опциональны
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub slide_interval_ms: Option<u32>,
    pub crossfade_hide_delay_ms: Option<u32>,
    pub crossfade: Option<bool>,
    pub pause_when_hidden: Option<bool>,
    pub contact_email: Option<String>,
    pub contact_subject: Option<String>,
    pub telegram_username: Option<String>,
    pub main_button_retry_ms: Option<Vec<u32>>,
    pub lazy_root_margin: Option<String>,
}
