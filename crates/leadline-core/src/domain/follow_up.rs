use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FollowUpMethod {
    #[default]
    #[serde(rename = "whatsapp")]
    WhatsApp,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "in_person")]
    InPerson,
}

impl FollowUpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpMethod::WhatsApp => "whatsapp",
            FollowUpMethod::Call => "call",
            FollowUpMethod::Email => "email",
            FollowUpMethod::InPerson => "in_person",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FollowUpMethod::WhatsApp => "WhatsApp",
            FollowUpMethod::Call => "Phone call",
            FollowUpMethod::Email => "Email",
            FollowUpMethod::InPerson => "In person",
        }
    }
}

impl fmt::Display for FollowUpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FollowUpMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "whatsapp" => Ok(FollowUpMethod::WhatsApp),
            "call" | "llamada" => Ok(FollowUpMethod::Call),
            "email" => Ok(FollowUpMethod::Email),
            "in_person" | "presencial" => Ok(FollowUpMethod::InPerson),
            _ => Err(CoreError::InvalidFollowUpMethod(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FollowUpMethod;

    #[test]
    fn parse_method_variants() {
        assert_eq!("WhatsApp".parse::<FollowUpMethod>().unwrap(), FollowUpMethod::WhatsApp);
        assert_eq!("in-person".parse::<FollowUpMethod>().unwrap(), FollowUpMethod::InPerson);
        assert_eq!("Llamada".parse::<FollowUpMethod>().unwrap(), FollowUpMethod::Call);
        assert!("pigeon".parse::<FollowUpMethod>().is_err());
    }
}
