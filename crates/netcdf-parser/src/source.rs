//! Access to named profile variables.
//!
//! The extractor only needs "the first profile's values of variable X". This
//! module defines that seam ([`VariableSource`]), a way to open files into it
//! ([`ProfileReader`]), and an in-memory implementation.

use std::collections::HashMap;
use std::path::Path;

use argo_common::{datetime_to_juld, RawProfile};

use crate::error::ExtractionResult;

/// Fill value used by ARGO for missing numeric samples.
pub const ARGO_FILL_VALUE: f64 = 99999.0;

/// ARGO core-profile variable names.
pub mod vars {
    pub const PLATFORM_NUMBER: &str = "PLATFORM_NUMBER";
    pub const CYCLE_NUMBER: &str = "CYCLE_NUMBER";
    pub const LATITUDE: &str = "LATITUDE";
    pub const LONGITUDE: &str = "LONGITUDE";
    pub const JULD: &str = "JULD";
    pub const PRES: &str = "PRES";
    pub const TEMP: &str = "TEMP";
    pub const PSAL: &str = "PSAL";
    pub const TEMP_QC: &str = "TEMP_QC";
    pub const PSAL_QC: &str = "PSAL_QC";
}

/// Named raw variables of one scientific file.
///
/// Both accessors return the slice belonging to the first profile (index 0 of
/// the `N_PROF` dimension) and `Ok(None)` when the variable does not exist.
pub trait VariableSource {
    /// Numeric values; fill values are returned as NaN.
    fn first_profile_values(&self, name: &str) -> ExtractionResult<Option<Vec<f64>>>;

    /// Raw bytes of a character variable.
    fn first_profile_chars(&self, name: &str) -> ExtractionResult<Option<Vec<u8>>>;
}

/// Opens a file path as a [`VariableSource`].
pub trait ProfileReader: Send + Sync {
    fn open(&self, path: &Path) -> ExtractionResult<Box<dyn VariableSource>>;
}

/// Map ARGO fill values and non-finite numbers to NaN.
pub fn mask_fill(value: f64, fill: f64) -> f64 {
    if !value.is_finite() || value == fill || value.abs() >= ARGO_FILL_VALUE {
        f64::NAN
    } else {
        value
    }
}

/// Variables held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    values: HashMap<String, Vec<f64>>,
    chars: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(mut self, name: &str, values: Vec<f64>) -> Self {
        self.values.insert(name.to_string(), values);
        self
    }

    pub fn with_chars(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.chars.insert(name.to_string(), bytes.into());
        self
    }

    /// Drop a variable, numeric or character.
    pub fn without(mut self, name: &str) -> Self {
        self.values.remove(name);
        self.chars.remove(name);
        self
    }

    /// Lay a profile out the way a core-profile file stores it.
    pub fn from_profile(profile: &RawProfile) -> Self {
        let encode_qc = |flags: &[Option<argo_common::QcFlag>]| -> Vec<u8> {
            flags
                .iter()
                .map(|flag| flag.map(|f| b'0' + f.code()).unwrap_or(b' '))
                .collect()
        };

        let mut source = Self::new()
            .with_chars(vars::PLATFORM_NUMBER, format!("{:<8}", profile.platform_number))
            .with_values(vars::CYCLE_NUMBER, vec![profile.cycle_number as f64])
            .with_values(vars::LATITUDE, vec![profile.latitude])
            .with_values(vars::LONGITUDE, vec![profile.longitude])
            .with_values(vars::JULD, vec![datetime_to_juld(profile.measurement_date)])
            .with_values(vars::PRES, profile.pressure().to_vec())
            .with_values(vars::TEMP, profile.temperature().to_vec())
            .with_values(vars::PSAL, profile.salinity().to_vec());

        if let Some(flags) = profile.temp_qc() {
            source = source.with_chars(vars::TEMP_QC, encode_qc(flags));
        }
        if let Some(flags) = profile.psal_qc() {
            source = source.with_chars(vars::PSAL_QC, encode_qc(flags));
        }
        source
    }
}

impl VariableSource for MemorySource {
    fn first_profile_values(&self, name: &str) -> ExtractionResult<Option<Vec<f64>>> {
        Ok(self.values.get(name).map(|values| {
            values
                .iter()
                .map(|&v| mask_fill(v, ARGO_FILL_VALUE))
                .collect()
        }))
    }

    fn first_profile_chars(&self, name: &str) -> ExtractionResult<Option<Vec<u8>>> {
        Ok(self.chars.get(name).cloned())
    }
}

/// Serves [`MemorySource`]s by file name instead of reading from disk.
///
/// Only the final path component is used for lookup, so the same reader works
/// for any directory the files are listed from.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<String, MemorySource>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file_name: &str, source: MemorySource) -> Self {
        self.files.insert(file_name.to_string(), source);
        self
    }

    pub fn with_profile(self, file_name: &str, profile: &RawProfile) -> Self {
        self.with_file(file_name, MemorySource::from_profile(profile))
    }
}

impl ProfileReader for MemoryReader {
    fn open(&self, path: &Path) -> ExtractionResult<Box<dyn VariableSource>> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.files.get(&name) {
            Some(source) => Ok(Box::new(source.clone())),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no in-memory file named {}", name),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_fill() {
        assert!(mask_fill(99999.0, ARGO_FILL_VALUE).is_nan());
        assert!(mask_fill(999999.0, ARGO_FILL_VALUE).is_nan());
        assert!(mask_fill(-5.0, -5.0).is_nan());
        assert!(mask_fill(f64::INFINITY, ARGO_FILL_VALUE).is_nan());
        assert_eq!(mask_fill(1523.4, ARGO_FILL_VALUE), 1523.4);
    }

    #[test]
    fn test_memory_source_masks_fill() {
        let source = MemorySource::new().with_values("PRES", vec![5.0, 99999.0]);
        let values = source.first_profile_values("PRES").unwrap().unwrap();
        assert_eq!(values[0], 5.0);
        assert!(values[1].is_nan());
        assert!(source.first_profile_values("TEMP").unwrap().is_none());
    }

    #[test]
    fn test_memory_reader_lookup_by_file_name() {
        let reader = MemoryReader::new()
            .with_file("R1_001.nc", MemorySource::new().with_values("LATITUDE", vec![3.0]));

        let source = reader.open(Path::new("/any/dir/R1_001.nc")).unwrap();
        assert_eq!(
            source.first_profile_values("LATITUDE").unwrap(),
            Some(vec![3.0])
        );
        assert!(reader.open(Path::new("R1_002.nc")).is_err());
    }

    #[test]
    fn test_without_removes_variable() {
        let source = MemorySource::new()
            .with_values("LATITUDE", vec![1.0])
            .without("LATITUDE");
        assert!(source.first_profile_values("LATITUDE").unwrap().is_none());
    }
}
