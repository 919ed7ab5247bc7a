use crate::domain::follow_up::FollowUpMethod;
use crate::domain::ids::LeadId;
use crate::domain::status::LeadStatus;
use crate::domain::tag::TagName;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub product_interest: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub tags: Vec<TagName>,
    pub next_follow_up: Option<i64>,
    pub follow_up_method: Option<FollowUpMethod>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lead {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(())
    }
}

/// Field set for inserting a lead; identity and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadNew {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub product_interest: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub tags: Vec<TagName>,
    pub next_follow_up: Option<i64>,
    pub follow_up_method: Option<FollowUpMethod>,
    pub notes: Option<String>,
}
