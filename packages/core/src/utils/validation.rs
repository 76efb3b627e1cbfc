use crate::utils::error::{Result, SiteError};

/// Цвет в формате #RRGGBB (то, что принимают setHeaderColor/setBackgroundColor)
pub fn validate_hex_color(color: &str) -> Result<()> {
    let digits = color
        .strip_prefix('#')
        .ok_or_else(|| SiteError::ValidationError(format!("Color must start with '#': {}", color)))?;

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SiteError::ValidationError(format!(
            "Color must be #RRGGBB: {}",
            color
        )));
    }
    Ok(())
}

/// Имя пользователя Telegram: 5-32 символа, латиница, цифры и '_'
pub fn validate_telegram_username(username: &str) -> Result<()> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !(5..=32).contains(&username.len()) || !valid_chars {
        return Err(SiteError::ValidationError(format!(
            "Invalid Telegram username: {}",
            username
        )));
    }
    Ok(())
}
