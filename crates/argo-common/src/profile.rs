//! Profile records flowing through the ingestion pipeline.
//!
//! A [`RawProfile`] is what the extractor reads from one file. Derivation adds
//! [`DerivedFields`] and a region to form a [`DerivedProfile`], which is then
//! sanitized into a [`ProfileRecord`] for storage and serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::qc::QcFlag;
use crate::region::OceanRegion;

/// Platform identifier used when the file does not carry one.
pub const UNKNOWN_PLATFORM: &str = "UNKNOWN";

/// Data source tag written with every record.
pub const DEFAULT_DATA_SOURCE: &str = "ARGO";

/// One vertical profile as read from a source file.
///
/// Measurement sequences are parallel arrays indexed by vertical level; NaN
/// marks a missing sample. The constructor guarantees equal lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawProfile {
    pub platform_number: String,
    pub cycle_number: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub measurement_date: DateTime<Utc>,
    pressure: Vec<f64>,
    temperature: Vec<f64>,
    salinity: Vec<f64>,
    temp_qc: Option<Vec<Option<QcFlag>>>,
    psal_qc: Option<Vec<Option<QcFlag>>>,
}

impl RawProfile {
    /// Build a profile, checking that the measurement sequences line up.
    pub fn new(
        platform_number: impl Into<String>,
        cycle_number: i32,
        latitude: f64,
        longitude: f64,
        measurement_date: DateTime<Utc>,
        pressure: Vec<f64>,
        temperature: Vec<f64>,
        salinity: Vec<f64>,
    ) -> ProfileResult<Self> {
        let levels = pressure.len();
        check_len("temperature", levels, temperature.len())?;
        check_len("salinity", levels, salinity.len())?;

        Ok(Self {
            platform_number: platform_number.into(),
            cycle_number,
            latitude,
            longitude,
            measurement_date,
            pressure,
            temperature,
            salinity,
            temp_qc: None,
            psal_qc: None,
        })
    }

    /// Attach quality-flag sequences. Either may be absent.
    pub fn with_qc(
        mut self,
        temp_qc: Option<Vec<Option<QcFlag>>>,
        psal_qc: Option<Vec<Option<QcFlag>>>,
    ) -> ProfileResult<Self> {
        if let Some(flags) = &temp_qc {
            check_len("temp_qc", self.n_levels(), flags.len())?;
        }
        if let Some(flags) = &psal_qc {
            check_len("psal_qc", self.n_levels(), flags.len())?;
        }
        self.temp_qc = temp_qc;
        self.psal_qc = psal_qc;
        Ok(self)
    }

    /// Number of vertical sampling levels.
    pub fn n_levels(&self) -> usize {
        self.pressure.len()
    }

    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn salinity(&self) -> &[f64] {
        &self.salinity
    }

    pub fn temp_qc(&self) -> Option<&[Option<QcFlag>]> {
        self.temp_qc.as_deref()
    }

    pub fn psal_qc(&self) -> Option<&[Option<QcFlag>]> {
        self.psal_qc.as_deref()
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> ProfileResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ProfileError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

/// Quantities computed from the valid samples of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Raw level indices that passed the validity mask, in order.
    pub valid_levels: Vec<usize>,
    /// Absolute salinity (g/kg), aligned with `valid_levels`.
    pub absolute_salinity: Vec<f64>,
    /// Conservative temperature (°C), aligned with `valid_levels`.
    pub conservative_temperature: Vec<f64>,
    /// Potential density anomaly sigma-0 (kg/m³), aligned with `valid_levels`.
    pub potential_density: Vec<f64>,
    /// Mixed-layer depth in pressure units (dbar).
    pub mixed_layer_depth: f64,
    /// Deepest valid pressure sample (dbar).
    pub max_depth: f64,
}

impl DerivedFields {
    /// Zero-valued result used when derivation is not possible.
    pub fn fallback() -> Self {
        Self {
            valid_levels: Vec::new(),
            absolute_salinity: Vec::new(),
            conservative_temperature: Vec::new(),
            potential_density: Vec::new(),
            mixed_layer_depth: 0.0,
            max_depth: 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.valid_levels.is_empty() && self.max_depth == 0.0 && self.mixed_layer_depth == 0.0
    }
}

/// The jointly valid samples of a profile, in level order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubset {
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
    pub salinity: Vec<f64>,
}

/// A raw profile together with its derived fields and region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedProfile {
    pub raw: RawProfile,
    pub derived: DerivedFields,
    pub ocean_region: OceanRegion,
}

impl DerivedProfile {
    pub fn new(raw: RawProfile, derived: DerivedFields, ocean_region: OceanRegion) -> Self {
        Self {
            raw,
            derived,
            ocean_region,
        }
    }

    /// Raw samples at the levels the derivation used.
    pub fn valid_subset(&self) -> ValidSubset {
        let pick = |values: &[f64]| -> Vec<f64> {
            self.derived
                .valid_levels
                .iter()
                .filter_map(|&i| values.get(i).copied())
                .collect()
        };

        ValidSubset {
            pressure: pick(self.raw.pressure()),
            temperature: pick(self.raw.temperature()),
            salinity: pick(self.raw.salinity()),
        }
    }
}

/// Serialization-safe profile: absent values are `None`, never NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub platform_number: String,
    pub cycle_number: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub measurement_date: DateTime<Utc>,
    pub pressure_levels: Vec<Option<f64>>,
    pub temperature: Vec<Option<f64>>,
    pub salinity: Vec<Option<f64>>,
    pub temp_qc: Vec<Option<QcFlag>>,
    pub psal_qc: Vec<Option<QcFlag>>,
    pub absolute_salinity: Vec<Option<f64>>,
    pub conservative_temperature: Vec<Option<f64>>,
    pub potential_density: Vec<Option<f64>>,
    pub mixed_layer_depth: Option<f64>,
    pub max_depth: Option<f64>,
    pub ocean_region: OceanRegion,
    pub data_source: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ProfileRecord {
    /// Present temperature samples.
    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.temperature.iter().flatten().copied()
    }

    /// Present salinity samples.
    pub fn salinities(&self) -> impl Iterator<Item = f64> + '_ {
        self.salinity.iter().flatten().copied()
    }
}
