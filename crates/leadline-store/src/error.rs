use leadline_core::domain::LeadId;
use leadline_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lead {0} not found")]
    LeadNotFound(LeadId),
    #[error("tag {0} not found")]
    TagNotFound(String),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("invalid database path: {0}")]
    InvalidDbPath(PathBuf),
    #[error("malformed {column} in database: {value}")]
    CorruptValue { column: &'static str, value: String },
    #[error("cannot locate a home directory for the default database")]
    MissingHomeDir,
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification callers branch on (exit codes, HTTP statuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotFound,
    InvalidInput,
    Corrupt,
    Environment,
    Database,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::LeadNotFound(_) | StoreError::TagNotFound(_) => StoreErrorKind::NotFound,
            StoreError::Core(_) | StoreError::InvalidFilter(_) | StoreError::InvalidDbPath(_) => {
                StoreErrorKind::InvalidInput
            }
            StoreError::CorruptValue { .. } => StoreErrorKind::Corrupt,
            StoreError::MissingHomeDir | StoreError::Io(_) => StoreErrorKind::Environment,
            StoreError::Migration(_) | StoreError::Sql(_) => StoreErrorKind::Database,
        }
    }
}
