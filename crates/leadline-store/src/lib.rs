//! SQLite persistence for leads, their interactions and tags.

pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod query;
pub mod repo;

use crate::error::Result;
use crate::repo::{InteractionsRepo, LeadsRepo, TagsRepo};
use rusqlite::Connection;
use std::path::Path;

pub use error::{StoreError, StoreErrorKind};
pub use query::{LeadQuery, Page};

/// Owns the connection; repos borrow it per call.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        db::open(path).map(|conn| Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        db::open_in_memory().map(|conn| Self { conn })
    }

    /// Brings the schema up to the latest migration.
    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn leads(&self) -> LeadsRepo<'_> {
        LeadsRepo::new(&self.conn)
    }

    pub fn interactions(&self) -> InteractionsRepo<'_> {
        InteractionsRepo::new(&self.conn)
    }

    pub fn tags(&self) -> TagsRepo<'_> {
        TagsRepo::new(&self.conn)
    }
}
