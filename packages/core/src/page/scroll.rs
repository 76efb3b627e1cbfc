// Плавная прокрутка к якорям

/// Селектор цели для ссылки вида `#section`
///
/// Голый `#` и внешние ссылки целей не имеют.
pub fn anchor_target(href: &str) -> Option<&str> {
    let href = href.trim();
    if href.starts_with('#') && href.len() > 1 && !href.contains(char::is_whitespace) {
        Some(href)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_target() {
        assert_eq!(anchor_target("#speakers"), Some("#speakers"));
        assert_eq!(anchor_target(" #hero "), Some("#hero"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("#a b"), None);
        assert_eq!(anchor_target("https://t.me/a_ivaschenko"), None);
    }
}
