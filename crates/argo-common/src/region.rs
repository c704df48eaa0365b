//! Ocean basin classification from profile coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProfileError;

/// Named ocean basin a profile is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OceanRegion {
    #[serde(rename = "Indian Ocean")]
    Indian,
    #[serde(rename = "Pacific Ocean")]
    Pacific,
    #[serde(rename = "Atlantic Ocean")]
    Atlantic,
    #[serde(rename = "Southern Ocean")]
    Southern,
    #[serde(rename = "Arctic Ocean")]
    Arctic,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl OceanRegion {
    pub const ALL: [OceanRegion; 6] = [
        OceanRegion::Indian,
        OceanRegion::Pacific,
        OceanRegion::Atlantic,
        OceanRegion::Southern,
        OceanRegion::Arctic,
        OceanRegion::Unknown,
    ];

    /// Label used in storage and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            OceanRegion::Indian => "Indian Ocean",
            OceanRegion::Pacific => "Pacific Ocean",
            OceanRegion::Atlantic => "Atlantic Ocean",
            OceanRegion::Southern => "Southern Ocean",
            OceanRegion::Arctic => "Arctic Ocean",
            OceanRegion::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OceanRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OceanRegion {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OceanRegion::ALL
            .iter()
            .copied()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProfileError::UnknownRegion(s.to_string()))
    }
}

/// Shift negative longitudes into the 0..360 convention.
pub fn normalize_longitude(lon: f64) -> f64 {
    if lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Classify a position into an ocean basin.
///
/// Rules are evaluated in a fixed order and the first match wins. The Pacific
/// band also covers 0..70°E and 290..360°E, so positions there never reach the
/// Atlantic rule.
pub fn classify_region(lat: f64, lon: f64) -> OceanRegion {
    if !lat.is_finite() || !lon.is_finite() {
        return OceanRegion::Unknown;
    }

    let lon = normalize_longitude(lon);

    if (-60.0..=30.0).contains(&lat) && (20.0..=120.0).contains(&lon) {
        OceanRegion::Indian
    } else if (120.0..=290.0).contains(&lon)
        || (290.0..=360.0).contains(&lon)
        || (0.0..=70.0).contains(&lon)
    {
        OceanRegion::Pacific
    } else if lon >= 290.0 || lon <= 20.0 {
        OceanRegion::Atlantic
    } else if lat < -60.0 {
        OceanRegion::Southern
    } else if lat > 66.0 {
        OceanRegion::Arctic
    } else {
        OceanRegion::Unknown
    }
}
