// Действие "Связаться": выбор между email и личным чатом в Telegram

use crate::config::Config;
use crate::host::{PopupButton, PopupButtonKind, PopupParams};

/// Выбранный способ связи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactChannel {
    Telegram,
    Email,
    Cancel,
}

impl ContactChannel {
    pub const TELEGRAM_ID: &'static str = "telegram";
    pub const EMAIL_ID: &'static str = "email";
    pub const CANCEL_ID: &'static str = "cancel";

    /// Разобрать id кнопки popup; всё неизвестное считается отменой
    pub fn from_button_id(id: Option<&str>) -> Self {
        match id {
            Some(Self::TELEGRAM_ID) => ContactChannel::Telegram,
            Some(Self::EMAIL_ID) => ContactChannel::Email,
            _ => ContactChannel::Cancel,
        }
    }

    /// Результат браузерного confirm: "ok" означает email
    pub fn from_confirm(accepted: bool) -> Self {
        if accepted {
            ContactChannel::Email
        } else {
            ContactChannel::Cancel
        }
    }
}

/// Исходящие ссылки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLinks {
    pub email: String,
    pub telegram: String,
}

impl ContactLinks {
    pub fn new(config: &Config) -> Self {
        Self {
            email: mailto_url(&config.contact_email, &config.contact_subject),
            telegram: telegram_url(&config.telegram_username),
        }
    }

    /// Ссылка для канала (`None` для отмены)
    pub fn url_for(&self, channel: ContactChannel) -> Option<&str> {
        match channel {
            ContactChannel::Telegram => Some(&self.telegram),
            ContactChannel::Email => Some(&self.email),
            ContactChannel::Cancel => None,
        }
    }
}

/// `mailto:<email>?subject=<subject>`
///
/// Тема передаётся как есть: браузер сам кодирует её при переходе.
pub fn mailto_url(email: &str, subject: &str) -> String {
    format!("mailto:{}?subject={}", email, subject)
}

/// `https://t.me/<username>`
pub fn telegram_url(username: &str) -> String {
    format!("https://t.me/{}", username.trim_start_matches('@'))
}

/// Popup выбора способа связи
pub fn contact_popup(config: &Config) -> PopupParams {
    PopupParams {
        title: Some(config.popup_title.clone()),
        message: config.popup_message.clone(),
        buttons: vec![
            PopupButton {
                id: ContactChannel::TELEGRAM_ID.to_string(),
                kind: PopupButtonKind::Default,
                text: Some("📱 Telegram".to_string()),
            },
            PopupButton {
                id: ContactChannel::EMAIL_ID.to_string(),
                kind: PopupButtonKind::Default,
                text: Some("✉️ Email".to_string()),
            },
            PopupButton {
                id: ContactChannel::CANCEL_ID.to_string(),
                kind: PopupButtonKind::Cancel,
                text: Some("Отмена".to_string()),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_links() {
        let links = ContactLinks::new(&Config::default());
        assert_eq!(
            links.email,
            "mailto:anna.anna.ivaschenko@gmail.com?subject=Контакт с сайта-визитки"
        );
        assert_eq!(links.telegram, "https://t.me/a_ivaschenko");
        assert_eq!(links.url_for(ContactChannel::Cancel), None);
    }

    #[test]
    fn test_button_ids() {
        assert_eq!(ContactChannel::from_button_id(Some("telegram")), ContactChannel::Telegram);
        assert_eq!(ContactChannel::from_button_id(Some("email")), ContactChannel::Email);
        assert_eq!(ContactChannel::from_button_id(Some("cancel")), ContactChannel::Cancel);
        assert_eq!(ContactChannel::from_button_id(Some("")), ContactChannel::Cancel);
        assert_eq!(ContactChannel::from_button_id(None), ContactChannel::Cancel);
    }

    #[test]
    fn test_popup_has_three_choices() {
        let popup = contact_popup(&Config::default());
        let ids: Vec<&str> = popup.buttons.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["telegram", "email", "cancel"]);
        assert_eq!(popup.buttons[2].kind, PopupButtonKind::Cancel);
    }

    #[test]
    fn test_telegram_url_strips_at() {
        assert_eq!(telegram_url("@a_ivaschenko"), "https://t.me/a_ivaschenko");
    }
}
