use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("name is required")]
    EmptyName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid tag name")]
    InvalidTagName,
    #[error("invalid lead status: {0}")]
    InvalidStatus(String),
    #[error("invalid follow-up method: {0}")]
    InvalidFollowUpMethod(String),
    #[error("invalid interaction kind: {0}")]
    InvalidInteractionKind(String),
    #[error("interaction content is empty")]
    EmptyInteractionContent,
    #[error("status {0} has no next pipeline stage")]
    NoNextStatus(String),
}
