//! NetCDF extraction for ARGO core-profile files.
//!
//! Reads one profile file and yields a [`RawProfile`](argo_common::RawProfile):
//! coordinates, cycle, platform, JULD timestamp, and the pressure /
//! temperature / salinity arrays with their QC flags.
//!
//! # ARGO file layout
//!
//! Core-profile files (`R*.nc`, `D*.nc`) store per-profile scalars on the
//! `N_PROF` dimension and measurements on `(N_PROF, N_LEVELS)`. Missing
//! samples carry the `_FillValue` (99999.0), which is mapped to NaN here.

pub mod error;
pub mod extract;
pub mod native;
pub mod source;

pub use error::{ExtractionError, ExtractionResult};
pub use extract::{extract_profile, ExtractOptions, TimestampPolicy};
pub use native::{silence_hdf5_errors, NetcdfReader, NetcdfSource};
pub use source::{
    vars, MemoryReader, MemorySource, ProfileReader, VariableSource, ARGO_FILL_VALUE,
};
