//! Error types for persistence.

use thiserror::Error;
use uuid::Uuid;

/// Result type for storage operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Search index error: {0}")]
    SearchError(String),

    #[error("Profile not found: {0}")]
    NotFound(Uuid),
}
