//! Error types for profile construction.

use thiserror::Error;

/// Result type alias using ProfileError.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors raised when assembling profile records.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("Sequence '{field}' has {actual} levels, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown ocean region: {0}")]
    UnknownRegion(String),

    #[error("Invalid QC flag code: {0}")]
    InvalidQcFlag(u8),
}
