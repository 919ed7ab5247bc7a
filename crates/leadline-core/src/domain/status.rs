use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sales pipeline stage of a lead.
///
/// `New -> Contacted -> Interested -> Closed` is the forward progression;
/// `Discarded` is a terminal side branch reachable from any stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    #[serde(alias = "Nuevo")]
    New,
    #[serde(alias = "Contactado")]
    Contacted,
    #[serde(alias = "Interesado")]
    Interested,
    #[serde(alias = "Cerrado")]
    Closed,
    #[serde(alias = "Descartado")]
    Discarded,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Interested,
        LeadStatus::Closed,
        LeadStatus::Discarded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Interested => "Interested",
            LeadStatus::Closed => "Closed",
            LeadStatus::Discarded => "Discarded",
        }
    }

    pub fn next(&self) -> Option<LeadStatus> {
        match self {
            LeadStatus::New => Some(LeadStatus::Contacted),
            LeadStatus::Contacted => Some(LeadStatus::Interested),
            LeadStatus::Interested => Some(LeadStatus::Closed),
            LeadStatus::Closed | LeadStatus::Discarded => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "nuevo" => Ok(LeadStatus::New),
            "contacted" | "contactado" => Ok(LeadStatus::Contacted),
            "interested" | "interesado" => Ok(LeadStatus::Interested),
            "closed" | "cerrado" => Ok(LeadStatus::Closed),
            "discarded" | "descartado" => Ok(LeadStatus::Discarded),
            _ => Err(CoreError::InvalidStatus(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LeadStatus;

    #[test]
    fn parses_english_and_spanish_labels() {
        assert_eq!("new".parse::<LeadStatus>().unwrap(), LeadStatus::New);
        assert_eq!("Nuevo".parse::<LeadStatus>().unwrap(), LeadStatus::New);
        assert_eq!(" CERRADO ".parse::<LeadStatus>().unwrap(), LeadStatus::Closed);
        assert!("won".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn pipeline_stops_at_closed() {
        assert_eq!(LeadStatus::New.next(), Some(LeadStatus::Contacted));
        assert_eq!(LeadStatus::Interested.next(), Some(LeadStatus::Closed));
        assert_eq!(LeadStatus::Closed.next(), None);
        assert_eq!(LeadStatus::Discarded.next(), None);
    }

    #[test]
    fn serde_accepts_spanish_alias() {
        let status: LeadStatus = serde_json::from_str("\"Interesado\"").unwrap();
        assert_eq!(status, LeadStatus::Interested);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Interested\"");
    }
}
