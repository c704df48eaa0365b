//! Common types and utilities shared across the ARGO ingestion crates.

pub mod error;
pub mod profile;
pub mod qc;
pub mod region;
pub mod time;

pub use error::{ProfileError, ProfileResult};
pub use profile::{
    DerivedFields, DerivedProfile, ProfileRecord, RawProfile, ValidSubset, DEFAULT_DATA_SOURCE,
    UNKNOWN_PLATFORM,
};
pub use qc::QcFlag;
pub use region::{classify_region, normalize_longitude, OceanRegion};
pub use time::{argo_epoch, datetime_to_juld, juld_to_datetime};
