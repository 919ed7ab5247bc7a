pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// Shape check equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, ch)| ch == '.' && idx > 0 && idx + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, normalize_email};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  Ana@Example.com ");
        assert_eq!(value.as_deref(), Some("ana@example.com"));
        assert!(normalize_email("   ").is_none());
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("bob@example.com"));
        assert!(is_valid_email("ana@x.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for value in [
            "bob@",
            "@example.com",
            "bob",
            "bob@example",
            "bob@.com",
            "bob@example.",
            "bob@@example.com",
            "bob@exa mple.com",
            "",
        ] {
            assert!(!is_valid_email(value), "accepted {value:?}");
        }
    }
}
