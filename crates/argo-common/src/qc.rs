//! ARGO per-sample quality control flags.
//!
//! Core ARGO files store one ASCII digit per level in `TEMP_QC` / `PSAL_QC`
//! (and a blank for levels without a measurement).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProfileError;

/// Reference table 2 of the ARGO user manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum QcFlag {
    NoQc,
    Good,
    ProbablyGood,
    ProbablyBad,
    Bad,
    Changed,
    Estimated,
    Missing,
}

impl QcFlag {
    /// Parse a numeric QC code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(QcFlag::NoQc),
            1 => Some(QcFlag::Good),
            2 => Some(QcFlag::ProbablyGood),
            3 => Some(QcFlag::ProbablyBad),
            4 => Some(QcFlag::Bad),
            5 => Some(QcFlag::Changed),
            8 => Some(QcFlag::Estimated),
            9 => Some(QcFlag::Missing),
            _ => None,
        }
    }

    /// Parse the ASCII digit stored in the NetCDF char array.
    pub fn from_ascii(byte: u8) -> Option<Self> {
        if byte.is_ascii_digit() {
            Self::from_code(byte - b'0')
        } else {
            None
        }
    }

    pub fn code(self) -> u8 {
        match self {
            QcFlag::NoQc => 0,
            QcFlag::Good => 1,
            QcFlag::ProbablyGood => 2,
            QcFlag::ProbablyBad => 3,
            QcFlag::Bad => 4,
            QcFlag::Changed => 5,
            QcFlag::Estimated => 8,
            QcFlag::Missing => 9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QcFlag::NoQc => "no_qc",
            QcFlag::Good => "good",
            QcFlag::ProbablyGood => "probably_good",
            QcFlag::ProbablyBad => "probably_bad",
            QcFlag::Bad => "bad",
            QcFlag::Changed => "changed",
            QcFlag::Estimated => "estimated",
            QcFlag::Missing => "missing",
        }
    }

    /// True for flags 3 and 4, which ARGO recommends not using.
    pub fn is_bad(self) -> bool {
        matches!(self, QcFlag::ProbablyBad | QcFlag::Bad)
    }

    /// Parse a whole QC string, one flag per level.
    pub fn parse_levels(bytes: &[u8]) -> Vec<Option<QcFlag>> {
        bytes.iter().map(|&b| Self::from_ascii(b)).collect()
    }
}

impl From<QcFlag> for u8 {
    fn from(flag: QcFlag) -> u8 {
        flag.code()
    }
}

impl TryFrom<u8> for QcFlag {
    type Error = ProfileError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        QcFlag::from_code(code).ok_or(ProfileError::InvalidQcFlag(code))
    }
}

impl fmt::Display for QcFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
