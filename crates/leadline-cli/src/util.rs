use crate::error::invalid_input;
use anyhow::Result;
use leadline_core::domain::{dedupe_tags, is_valid_email, LeadId, TagName};
use leadline_core::rules::FollowUpState;
use leadline_core::CoreError;
use std::str::FromStr;

pub fn parse_lead_id(raw: &str) -> Result<LeadId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("lead id cannot be empty"));
    }
    LeadId::from_str(trimmed).map_err(|_| invalid_input("invalid lead id"))
}

pub fn parse_tags(raw: &[String]) -> Result<Vec<TagName>> {
    Ok(dedupe_tags(raw.iter().map(String::as_str))?)
}

/// Empty input clears the field.
pub fn normalize_optional_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn checked_email(value: Option<String>) -> Result<Option<String>> {
    match value.and_then(normalize_optional_value) {
        Some(email) if !is_valid_email(&email) => Err(CoreError::InvalidEmail(email).into()),
        other => Ok(other),
    }
}

pub fn follow_up_label(state: FollowUpState) -> &'static str {
    match state {
        FollowUpState::Unscheduled => "-",
        FollowUpState::Overdue => "overdue",
        FollowUpState::Today => "today",
        FollowUpState::Upcoming => "upcoming",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_values_clear() {
        assert_eq!(normalize_optional_value("  ".to_string()), None);
        assert_eq!(
            normalize_optional_value(" Bogotá ".to_string()).as_deref(),
            Some("Bogotá")
        );
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(checked_email(Some("bob@".to_string())).is_err());
        assert_eq!(
            checked_email(Some("bob@example.com".to_string())).unwrap().as_deref(),
            Some("bob@example.com")
        );
        assert_eq!(checked_email(Some(String::new())).unwrap(), None);
    }

    #[test]
    fn lead_ids_must_be_uuids() {
        assert!(parse_lead_id("nope").is_err());
        let id = LeadId::new();
        assert_eq!(parse_lead_id(&id.to_string()).unwrap(), id);
    }
}
