/// Prefixes `code` unless the input already carries an international prefix.
pub fn with_calling_code(code: Option<&str>, input: &str) -> String {
    match code {
        Some(code) if !input.starts_with('+') => format!("{code} {input}"),
        _ => input.to_string(),
    }
}

/// Optional leading `+`, then at least ten digits, spaces or hyphens.
pub fn is_valid_phone(value: &str) -> bool {
    let rest = value.strip_prefix('+').unwrap_or(value);
    rest.chars().count() >= 10
        && rest
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_whitespace() || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::{is_valid_phone, with_calling_code};

    #[test]
    fn prefixes_missing_code() {
        assert_eq!(with_calling_code(Some("+57"), "3001234567"), "+57 3001234567");
    }

    #[test]
    fn keeps_existing_prefix() {
        assert_eq!(with_calling_code(Some("+57"), "+1 5551234567"), "+1 5551234567");
        assert_eq!(with_calling_code(None, "3001234567"), "3001234567");
    }

    #[test]
    fn validates_length_and_charset() {
        assert!(is_valid_phone("+1 5551234567"));
        assert!(is_valid_phone("300-123-4567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+57 300abc4567"));
        assert!(!is_valid_phone("++573001234567"));
    }
}
