use crate::domain::ids::{InteractionId, LeadId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    #[default]
    Note,
    Call,
    Email,
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Meeting,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Note => "note",
            InteractionKind::Call => "call",
            InteractionKind::Email => "email",
            InteractionKind::WhatsApp => "whatsapp",
            InteractionKind::Meeting => "meeting",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(InteractionKind::Note),
            "call" => Ok(InteractionKind::Call),
            "email" => Ok(InteractionKind::Email),
            "whatsapp" => Ok(InteractionKind::WhatsApp),
            "meeting" => Ok(InteractionKind::Meeting),
            _ => Err(CoreError::InvalidInteractionKind(s.trim().to_string())),
        }
    }
}

/// A timestamped note or logged contact event owned by one lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub lead_id: LeadId,
    pub created_at: i64,
    pub kind: InteractionKind,
    pub content: String,
}

impl Interaction {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.content.trim().is_empty() {
            return Err(CoreError::EmptyInteractionContent);
        }
        Ok(())
    }
}
