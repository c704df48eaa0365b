//! Error types for profile extraction.

use argo_common::ProfileError;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Reasons a file cannot be turned into a raw profile.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Required variable absent (or holding only fill values)
    #[error("Missing required variable: {0}")]
    MissingVariable(String),

    /// JULD absent and the timestamp policy forbids substituting one
    #[error("Missing measurement timestamp (JULD)")]
    MissingTimestamp,

    /// The NetCDF library could not open the file
    #[error("Failed to open NetCDF file: {0}")]
    Open(String),

    /// The NetCDF library could not read a variable
    #[error("Failed to read variable '{variable}': {message}")]
    Read { variable: String, message: String },

    /// Measurement sequences do not line up
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
