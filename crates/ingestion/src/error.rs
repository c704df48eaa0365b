//! Error types for the ingestion crate.

use thiserror::Error;

use netcdf_parser::ExtractionError;
use storage::PersistenceError;

/// Errors that fail a single file or an orchestrator query.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to extract profile: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Failed to persist profile: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
