//! Derived oceanographic quantities for one profile.

use thiserror::Error;

use argo_common::{DerivedFields, QcFlag, RawProfile};

use crate::seawater::{SeawaterEquations, SeawaterError};

/// Default temperature step (°C) that marks the base of the mixed layer.
pub const DEFAULT_MLD_THRESHOLD: f64 = 0.2;

/// Default minimum number of jointly valid samples.
pub const DEFAULT_MIN_VALID_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivationConfig {
    /// Temperature difference from the shallowest sample that ends the mixed layer.
    pub mld_threshold: f64,
    pub min_valid_samples: usize,
    /// Also mask samples whose TEMP or PSAL flag is probably-bad or bad.
    pub reject_bad_qc: bool,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            mld_threshold: DEFAULT_MLD_THRESHOLD,
            min_valid_samples: DEFAULT_MIN_VALID_SAMPLES,
            reject_bad_qc: false,
        }
    }
}

/// Why derivation fell back to zero-valued fields. Never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivationWarning {
    #[error("only {valid} valid samples, need at least {required}")]
    InsufficientSamples { valid: usize, required: usize },

    #[error("seawater equations failed: {0}")]
    Numeric(#[from] SeawaterError),
}

/// Indices of levels where pressure, temperature and salinity are all present.
pub fn valid_levels(raw: &RawProfile, reject_bad_qc: bool) -> Vec<usize> {
    let flagged = |flags: Option<&[Option<QcFlag>]>, i: usize| -> bool {
        flags
            .and_then(|f| f.get(i).copied().flatten())
            .is_some_and(QcFlag::is_bad)
    };

    (0..raw.n_levels())
        .filter(|&i| {
            raw.pressure()[i].is_finite()
                && raw.temperature()[i].is_finite()
                && raw.salinity()[i].is_finite()
        })
        .filter(|&i| !(reject_bad_qc && (flagged(raw.temp_qc(), i) || flagged(raw.psal_qc(), i))))
        .collect()
}

/// Mixed-layer depth by the temperature-threshold criterion.
///
/// Returns the pressure of the first sample whose temperature differs from
/// the shallowest one by more than `threshold`, the deepest pressure when no
/// sample does, and 0 with fewer than two samples.
pub fn mixed_layer_depth(pressure: &[f64], temperature: &[f64], threshold: f64) -> f64 {
    if pressure.len() < 2 || temperature.len() < 2 {
        return 0.0;
    }

    let surface = temperature[0];
    pressure
        .iter()
        .zip(temperature)
        .find(|&(_, &t)| (t - surface).abs() > threshold)
        .map(|(&p, _)| p)
        // Pressure is assumed to increase with level, so the deepest sample is also the last.
        .unwrap_or_else(|| max_depth(pressure))
}

/// Largest pressure sample, or 0 for an empty profile.
pub fn max_depth(pressure: &[f64]) -> f64 {
    pressure.iter().copied().fold(0.0, f64::max)
}

/// Compute the derived fields of a profile.
///
/// Uses only jointly valid samples (see [`valid_levels`]); the derived
/// sequences are aligned with `DerivedFields::valid_levels`.
pub fn derive(
    raw: &RawProfile,
    config: &DerivationConfig,
    equations: &dyn SeawaterEquations,
) -> Result<DerivedFields, DerivationWarning> {
    let levels = valid_levels(raw, config.reject_bad_qc);
    if levels.len() < config.min_valid_samples {
        return Err(DerivationWarning::InsufficientSamples {
            valid: levels.len(),
            required: config.min_valid_samples,
        });
    }

    let pressure: Vec<f64> = levels.iter().map(|&i| raw.pressure()[i]).collect();
    let temperature: Vec<f64> = levels.iter().map(|&i| raw.temperature()[i]).collect();

    let mut absolute_salinity = Vec::with_capacity(levels.len());
    let mut conservative_temperature = Vec::with_capacity(levels.len());
    let mut potential_density = Vec::with_capacity(levels.len());

    for &i in &levels {
        let p = raw.pressure()[i];
        let sa = equations.absolute_salinity(raw.salinity()[i], p, raw.longitude, raw.latitude)?;
        let ct = equations.conservative_temperature(sa, raw.temperature()[i], p)?;
        let sigma0 = equations.potential_density(sa, ct)?;

        absolute_salinity.push(sa);
        conservative_temperature.push(ct);
        potential_density.push(sigma0);
    }

    Ok(DerivedFields {
        mixed_layer_depth: mixed_layer_depth(&pressure, &temperature, config.mld_threshold),
        max_depth: max_depth(&pressure),
        valid_levels: levels,
        absolute_salinity,
        conservative_temperature,
        potential_density,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seawater::Teos10;
    use test_utils::fixtures;

    // =========================================================================
    // Mixed-layer depth
    // =========================================================================

    #[test]
    fn test_mld_constant_temperature_is_deepest() {
        let p = [5.0, 50.0, 100.0, 200.0];
        assert_eq!(mixed_layer_depth(&p, &[18.0; 4], 0.2), 200.0);
    }

    #[test]
    fn test_mld_without_crossing_is_last_level_of_ascending_profile() {
        let p = [4.0, 10.0, 35.5, 80.0, 120.0];
        let mld = mixed_layer_depth(&p, &[25.0, 25.1, 24.95, 25.05, 25.1], 0.2);
        assert_eq!(mld, *p.last().unwrap());
        assert_eq!(mld, max_depth(&p));
    }

    #[test]
    fn test_mld_single_sample_is_zero() {
        assert_eq!(mixed_layer_depth(&[5.0], &[27.0], 0.2), 0.0);
        assert_eq!(mixed_layer_depth(&[], &[], 0.2), 0.0);
    }

    #[test]
    fn test_mld_threshold_is_strict() {
        let p = [0.0, 10.0, 20.0];
        assert_eq!(mixed_layer_depth(&p, &[20.0, 19.8, 19.0], 0.2), 20.0);
        assert_eq!(mixed_layer_depth(&p, &[20.0, 20.3, 19.0], 0.2), 10.0);
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(max_depth(&[2.5, 50.0, 20.0]), 50.0);
        assert_eq!(max_depth(&[]), 0.0);
    }

    // =========================================================================
    // Validity mask
    // =========================================================================

    #[test]
    fn test_valid_levels_skip_gaps() {
        assert_eq!(valid_levels(&fixtures::gappy_profile(), false), vec![0, 3, 5]);
    }

    #[test]
    fn test_bad_qc_masked_only_when_enabled() {
        let raw = fixtures::scenario_profile_with_bad_qc();
        assert_eq!(valid_levels(&raw, false), vec![0, 1, 2, 3]);
        assert_eq!(valid_levels(&raw, true), vec![0, 1, 2]);
    }

    // =========================================================================
    // Full derivation
    // =========================================================================

    #[test]
    fn test_scenario_profile() {
        let derived = derive(
            &fixtures::scenario_profile(),
            &DerivationConfig::default(),
            &Teos10,
        )
        .unwrap();

        assert_eq!(derived.mixed_layer_depth, 20.0);
        assert_eq!(derived.max_depth, 50.0);
        assert_eq!(derived.valid_levels, vec![0, 1, 2, 3]);
        assert_eq!(derived.absolute_salinity.len(), 4);
        assert!(derived
            .potential_density
            .windows(2)
            .all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn test_derived_sequences_align_with_valid_subset() {
        let derived = derive(
            &fixtures::gappy_profile(),
            &DerivationConfig::default(),
            &Teos10,
        )
        .unwrap();

        assert_eq!(derived.valid_levels.len(), 3);
        assert_eq!(derived.conservative_temperature.len(), 3);
        assert_eq!(derived.potential_density.len(), 3);
        assert_eq!(derived.max_depth, 150.0);
    }

    #[test]
    fn test_insufficient_samples() {
        let err = derive(
            &fixtures::single_level_profile(),
            &DerivationConfig::default(),
            &Teos10,
        )
        .unwrap_err();

        assert_eq!(
            err,
            DerivationWarning::InsufficientSamples {
                valid: 1,
                required: 3
            }
        );
    }

    #[test]
    fn test_min_samples_configurable() {
        let config = DerivationConfig {
            min_valid_samples: 1,
            ..Default::default()
        };
        let derived = derive(&fixtures::single_level_profile(), &config, &Teos10).unwrap();
        assert_eq!(derived.mixed_layer_depth, 0.0);
        assert_eq!(derived.max_depth, 5.0);
    }

    #[test]
    fn test_numeric_failure_is_warning() {
        let raw = RawProfile::new(
            "1",
            1,
            0.0,
            80.0,
            fixtures::scenario_date(),
            vec![5.0, 10.0, 20.0],
            vec![20.0, 19.0, 18.0],
            vec![35.0, -1.0, 35.0],
        )
        .unwrap();

        let err = derive(&raw, &DerivationConfig::default(), &Teos10).unwrap_err();
        assert!(matches!(err, DerivationWarning::Numeric(_)));
    }
}
