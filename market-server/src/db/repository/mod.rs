//! Repository Module
//!
//! Data access over the embedded SurrealDB store. Order state transitions
//! are single conditional `UPDATE ... WHERE ... RETURN AFTER` statements so
//! read-modify-write races cannot double-assign an order.

pub mod order;
pub mod scrap_item;
pub mod user;

pub use order::OrderRepository;
pub use scrap_item::ScrapItemRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Build a record id from an API path parameter
///
/// Accepts both the bare key and the full "table:key" form.
pub fn record_id(table: &str, id: &str) -> RecordId {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(tb, key),
        _ => RecordId::from_table_key(table, id),
    }
}
