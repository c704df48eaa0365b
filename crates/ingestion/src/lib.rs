//! ARGO profile ingestion library.
//!
//! Provides the per-file pipeline and the orchestrator that drives it over a
//! directory of core-profile NetCDF files.
//!
//! # Architecture
//!
//! For each file, in order:
//!
//! - Extraction of the first profile (`netcdf-parser`)
//! - Derivation of absolute salinity, conservative temperature, sigma-0,
//!   mixed-layer depth and maximum depth ([`derive`], [`seawater`])
//! - Ocean region classification (`argo-common`)
//! - Sanitization into a NaN-free [`ProfileRecord`](argo_common::ProfileRecord)
//! - Persistence to the profile store and the search index (`storage`)
//!
//! The [`Ingester`] is built from explicit collaborators, so tests run the
//! whole pipeline against in-memory readers and stores.

pub mod config;
pub mod derive;
pub mod error;
mod ingester;
pub mod metadata;
pub mod sanitize;
pub mod seawater;
pub mod summary;

// Re-exports
pub use config::{IngestionConfig, DEFAULT_FILE_EXTENSION};
pub use derive::{derive, DerivationConfig, DerivationWarning};
pub use error::{IngestionError, Result};
pub use ingester::{Ingester, IngestionStats, IngestionSummary};
pub use metadata::{list_profile_files, parse_argo_filename, ArgoFileInfo, DataMode};
pub use sanitize::Sanitize;
pub use seawater::{SeawaterEquations, SeawaterError, Teos10};
pub use summary::{profile_summary, search_document};
