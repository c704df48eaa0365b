//! Turn a [`VariableSource`] into a [`RawProfile`].

use chrono::{DateTime, Utc};
use tracing::warn;

use argo_common::{juld_to_datetime, QcFlag, RawProfile, UNKNOWN_PLATFORM};

use crate::error::{ExtractionError, ExtractionResult};
use crate::source::{vars, VariableSource};

/// What to do when a file carries no usable JULD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Substitute the current wall-clock time and log a warning.
    #[default]
    FallbackToNow,
    /// Fail extraction with [`ExtractionError::MissingTimestamp`].
    Reject,
}

/// Options for [`extract_profile`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub timestamp_policy: TimestampPolicy,
}

/// Extract the first profile of a file.
///
/// LATITUDE, LONGITUDE, PRES, TEMP and PSAL are required. PLATFORM_NUMBER
/// defaults to `"UNKNOWN"`, CYCLE_NUMBER to 0, and JULD follows the
/// configured [`TimestampPolicy`]. QC sequences whose length does not match
/// the profile are dropped with a warning.
pub fn extract_profile(
    source: &dyn VariableSource,
    options: &ExtractOptions,
) -> ExtractionResult<RawProfile> {
    let latitude = required_scalar(source, vars::LATITUDE)?;
    let longitude = required_scalar(source, vars::LONGITUDE)?;
    let pressure = required_values(source, vars::PRES)?;
    let temperature = required_values(source, vars::TEMP)?;
    let salinity = required_values(source, vars::PSAL)?;

    let platform_number = platform_number(source)?;
    let cycle_number = first_value(source, vars::CYCLE_NUMBER)?
        .filter(|v| v.is_finite())
        .map(|v| v as i32)
        .unwrap_or(0);
    let measurement_date = measurement_date(source, options.timestamp_policy, &platform_number)?;

    let profile = RawProfile::new(
        platform_number,
        cycle_number,
        latitude,
        longitude,
        measurement_date,
        pressure,
        temperature,
        salinity,
    )?;

    let levels = profile.n_levels();
    let temp_qc = qc_levels(source, vars::TEMP_QC, levels)?;
    let psal_qc = qc_levels(source, vars::PSAL_QC, levels)?;

    Ok(profile.with_qc(temp_qc, psal_qc)?)
}

fn first_value(source: &dyn VariableSource, name: &str) -> ExtractionResult<Option<f64>> {
    Ok(source
        .first_profile_values(name)?
        .and_then(|values| values.first().copied()))
}

fn required_scalar(source: &dyn VariableSource, name: &str) -> ExtractionResult<f64> {
    first_value(source, name)?
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractionError::MissingVariable(name.to_string()))
}

fn required_values(source: &dyn VariableSource, name: &str) -> ExtractionResult<Vec<f64>> {
    source
        .first_profile_values(name)?
        .ok_or_else(|| ExtractionError::MissingVariable(name.to_string()))
}

fn platform_number(source: &dyn VariableSource) -> ExtractionResult<String> {
    let platform = source
        .first_profile_chars(vars::PLATFORM_NUMBER)?
        .map(|bytes| {
            String::from_utf8_lossy(&bytes)
                .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        })
        .filter(|s| !s.is_empty());

    Ok(platform.unwrap_or_else(|| UNKNOWN_PLATFORM.to_string()))
}

fn measurement_date(
    source: &dyn VariableSource,
    policy: TimestampPolicy,
    platform: &str,
) -> ExtractionResult<DateTime<Utc>> {
    if let Some(date) = first_value(source, vars::JULD)?.and_then(juld_to_datetime) {
        return Ok(date);
    }

    match policy {
        TimestampPolicy::Reject => Err(ExtractionError::MissingTimestamp),
        TimestampPolicy::FallbackToNow => {
            warn!(
                platform = %platform,
                "JULD missing, using current time as measurement date"
            );
            Ok(Utc::now())
        }
    }
}

fn qc_levels(
    source: &dyn VariableSource,
    name: &str,
    levels: usize,
) -> ExtractionResult<Option<Vec<Option<QcFlag>>>> {
    let Some(bytes) = source.first_profile_chars(name)? else {
        return Ok(None);
    };

    if bytes.len() != levels {
        warn!(
            variable = name,
            flags = bytes.len(),
            levels = levels,
            "QC sequence length does not match profile, ignoring"
        );
        return Ok(None);
    }

    Ok(Some(QcFlag::parse_levels(&bytes)))
}
