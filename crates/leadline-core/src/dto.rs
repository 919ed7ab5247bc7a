use crate::domain::{FollowUpMethod, InteractionId, InteractionKind, LeadId, LeadStatus};
use crate::rules::FollowUpState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadListItemDto {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub status: LeadStatus,
    pub source: Option<String>,
    pub product_interest: Option<String>,
    pub follow_up_state: FollowUpState,
    pub next_follow_up: Option<i64>,
    pub created_at: i64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionDto {
    pub id: InteractionId,
    pub created_at: i64,
    pub kind: InteractionKind,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetailDto {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub product_interest: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub next_follow_up: Option<i64>,
    pub follow_up_method: Option<FollowUpMethod>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub tags: Vec<String>,
    pub interactions: Vec<InteractionDto>,
}

/// One pipeline column: a status and the leads currently in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineColumnDto {
    pub status: LeadStatus,
    pub leads: Vec<LeadListItemDto>,
}
