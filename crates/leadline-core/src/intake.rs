//! Lead intake from external channels (chat widget, web forms, integrators).

use crate::domain::{LeadNew, LeadStatus, TagName};
use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body accepted by the ingestion endpoint. Every field but `name` is optional.
///
/// Fields take any JSON scalar; integrators often send phone numbers as numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub product_interest: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Per-channel defaults applied to every intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeProfile {
    pub channel_tag: &'static str,
    pub source_fallback: &'static str,
    pub notes_fallback: Option<&'static str>,
    pub product_fallback: Option<&'static str>,
}

impl IntakeProfile {
    pub const WIDGET: IntakeProfile = IntakeProfile {
        channel_tag: "widget",
        source_fallback: "Widget Externo",
        notes_fallback: Some("Lead capturado vía chat widget."),
        product_fallback: Some("Chat Widget"),
    };

    pub const WEB: IntakeProfile = IntakeProfile {
        channel_tag: "Web-Incoming",
        source_fallback: "Web Externo",
        notes_fallback: None,
        product_fallback: None,
    };
}

impl IntakeRequest {
    /// Validates the request and fills channel defaults. Status is always `New`.
    pub fn into_lead(self, profile: &IntakeProfile) -> Result<LeadNew, CoreError> {
        let name = present(self.name).ok_or(CoreError::EmptyName)?;
        let tag = TagName::new(profile.channel_tag)?;

        Ok(LeadNew {
            name,
            email: present(self.email),
            phone: present(self.phone),
            source: Some(present(self.source).unwrap_or_else(|| profile.source_fallback.into())),
            status: LeadStatus::New,
            product_interest: present(self.product_interest)
                .or_else(|| profile.product_fallback.map(str::to_string)),
            country: present(self.country),
            city: present(self.city),
            tags: vec![tag],
            next_follow_up: None,
            follow_up_method: None,
            notes: present(self.notes).or_else(|| profile.notes_fallback.map(str::to_string)),
        })
    }
}

/// Strings pass through, other scalars use their JSON text, `null` is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
