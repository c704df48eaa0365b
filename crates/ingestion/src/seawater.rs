//! Seawater thermodynamics.
//!
//! The pipeline needs three conversions per sample: practical to absolute
//! salinity, in-situ to conservative temperature, and the potential density
//! anomaly referenced to the surface. [`SeawaterEquations`] is the seam;
//! [`Teos10`] is the built-in implementation.
//!
//! # Accuracy
//!
//! [`Teos10`] delegates to the `gsw` crate for reference salinity,
//! `CT_from_pt` and the 75-term `sigma0`. `gsw` has no `pt0_from_t`, so the
//! potential temperature comes from the Fofonoff-Millard integration
//! (UNESCO 1983), which agrees with TEOS-10 to about 1e-5 °C in the open
//! ocean.
//!
//! `gsw` does not ship the SAAR atlas either. Absolute salinity is therefore
//! the reference-composition salinity and omits the regional anomaly, which
//! stays below 0.03 g/kg and is usually under 0.005 g/kg.

use gsw::conversions::{ct_from_pt, sr_from_sp};
use gsw::volume::sigma0;
use thiserror::Error;

/// Ratio between absolute and practical salinity for standard seawater.
pub const REFERENCE_SALINITY_RATIO: f64 = 35.16504 / 35.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeawaterError {
    #[error("non-finite input {name} = {value}")]
    NonFiniteInput { name: &'static str, value: f64 },

    #[error("negative salinity {0}")]
    NegativeSalinity(f64),

    #[error("{0} evaluated to a non-finite value")]
    NonFiniteResult(&'static str),

    #[error("{name} failed: {message}")]
    Equation { name: &'static str, message: String },
}

pub type SeawaterResult<T> = Result<T, SeawaterError>;

/// Thermodynamic conversions used to derive profile quantities.
///
/// Units: salinity in g/kg (absolute) or PSU (practical), temperature in °C,
/// pressure in dbar, density anomaly in kg/m³.
pub trait SeawaterEquations: Send + Sync {
    fn absolute_salinity(
        &self,
        practical_salinity: f64,
        pressure: f64,
        longitude: f64,
        latitude: f64,
    ) -> SeawaterResult<f64>;

    fn conservative_temperature(
        &self,
        absolute_salinity: f64,
        temperature: f64,
        pressure: f64,
    ) -> SeawaterResult<f64>;

    /// Potential density anomaly sigma-0 (density at 0 dbar minus 1000).
    fn potential_density(
        &self,
        absolute_salinity: f64,
        conservative_temperature: f64,
    ) -> SeawaterResult<f64>;
}

/// TEOS-10 conversions backed by `gsw`; see the module docs for accuracy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Teos10;

impl SeawaterEquations for Teos10 {
    fn absolute_salinity(
        &self,
        practical_salinity: f64,
        pressure: f64,
        longitude: f64,
        latitude: f64,
    ) -> SeawaterResult<f64> {
        finite("practical_salinity", practical_salinity)?;
        finite("pressure", pressure)?;
        finite("longitude", longitude)?;
        finite("latitude", latitude)?;
        if practical_salinity < 0.0 {
            return Err(SeawaterError::NegativeSalinity(practical_salinity));
        }
        checked("absolute_salinity", sr_from_sp(practical_salinity))
    }

    fn conservative_temperature(
        &self,
        absolute_salinity: f64,
        temperature: f64,
        pressure: f64,
    ) -> SeawaterResult<f64> {
        finite("absolute_salinity", absolute_salinity)?;
        finite("temperature", temperature)?;
        finite("pressure", pressure)?;
        if absolute_salinity < 0.0 {
            return Err(SeawaterError::NegativeSalinity(absolute_salinity));
        }

        let sp = absolute_salinity / REFERENCE_SALINITY_RATIO;
        let pt = potential_temperature(sp, temperature, pressure, 0.0);
        let ct = ct_from_pt(absolute_salinity, pt).map_err(|e| equation("ct_from_pt", e))?;
        checked("conservative_temperature", ct)
    }

    fn potential_density(
        &self,
        absolute_salinity: f64,
        conservative_temperature: f64,
    ) -> SeawaterResult<f64> {
        finite("absolute_salinity", absolute_salinity)?;
        finite("conservative_temperature", conservative_temperature)?;
        if absolute_salinity < 0.0 {
            return Err(SeawaterError::NegativeSalinity(absolute_salinity));
        }

        let sigma = sigma0(absolute_salinity, conservative_temperature)
            .map_err(|e| equation("sigma0", e))?;
        checked("potential_density", sigma)
    }
}

fn equation(name: &'static str, err: gsw::Error) -> SeawaterError {
    SeawaterError::Equation {
        name,
        message: err.to_string(),
    }
}

fn finite(name: &'static str, value: f64) -> SeawaterResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SeawaterError::NonFiniteInput { name, value })
    }
}

fn checked(name: &'static str, value: f64) -> SeawaterResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SeawaterError::NonFiniteResult(name))
    }
}

/// Adiabatic lapse rate (°C/dbar), Bryden 1973.
fn adiabatic_lapse_rate(s: f64, t: f64, p: f64) -> f64 {
    let ds = s - 35.0;
    (((-2.1687e-16 * t + 1.8676e-14) * t - 4.6206e-13) * p
        + ((2.7759e-12 * t - 1.1351e-10) * ds
            + ((-5.4481e-14 * t + 8.733e-12) * t - 6.7795e-10) * t
            + 1.8741e-8))
        * p
        + (-4.2393e-8 * t + 1.8932e-6) * ds
        + ((6.6228e-10 * t - 6.836e-8) * t + 8.5258e-6) * t
        + 3.5803e-5
}

/// Potential temperature at reference pressure `pr` by fourth-order
/// Runge-Kutta integration of the lapse rate.
pub(crate) fn potential_temperature(s: f64, t0: f64, p0: f64, pr: f64) -> f64 {
    let h = pr - p0;
    let mut p = p0;
    let mut t = t0;

    let mut xk = h * adiabatic_lapse_rate(s, t, p);
    t += 0.5 * xk;
    let mut q = xk;
    p += 0.5 * h;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t += 0.292_893_22 * (xk - q);
    q = 0.585_786_44 * xk + 0.121_320_344 * q;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t += 1.707_106_781 * (xk - q);
    q = 3.414_213_562 * xk - 4.121_320_344 * q;
    p += 0.5 * h;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t + (xk - 2.0 * q) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_absolute_salinity_reference_composition() {
        let sa = Teos10.absolute_salinity(35.0, 0.0, 87.0, 2.0).unwrap();
        assert_approx_eq!(sa, 35.16504, 1e-9);
    }

    #[test]
    fn test_absolute_salinity_near_gsw_check_value() {
        // gsw_SA_from_SP(34.5487, 10, 188, 4) = 34.711778; the gap is the
        // regional anomaly.
        let sa = Teos10.absolute_salinity(34.5487, 10.0, 188.0, 4.0).unwrap();
        assert_approx_eq!(sa, 34.711778, 5e-4);
    }

    #[test]
    fn test_potential_temperature_check_value() {
        // UNESCO 1983 check value.
        assert_approx_eq!(potential_temperature(40.0, 40.0, 10000.0, 0.0), 36.89073, 1e-5);
    }

    #[test]
    fn test_ct_close_to_in_situ_near_surface() {
        let ct = Teos10.conservative_temperature(35.16504, 20.0, 0.0).unwrap();
        assert_approx_eq!(ct, 19.99286, 1e-4);
    }

    #[test]
    fn test_ct_matches_gsw_check_value() {
        // gsw_CT_from_t(34.7118, 28.7856, 10) = 28.809919826700281
        let ct = Teos10.conservative_temperature(34.7118, 28.7856, 10.0).unwrap();
        assert_approx_eq!(ct, 28.809920, 1e-5);
    }

    #[test]
    fn test_sigma0_matches_gsw_check_values() {
        // gsw_sigma0 75-term polynomial
        let sigma = Teos10.potential_density(34.7118, 28.8099).unwrap();
        assert_approx_eq!(sigma, 21.797901, 1e-5);

        let sigma = Teos10.potential_density(34.8915, 7.8564).unwrap();
        assert_approx_eq!(sigma, 27.082092, 1e-5);
    }

    #[test]
    fn test_sigma0_increases_with_salinity_and_cooling() {
        let warm = Teos10.potential_density(34.5, 28.0).unwrap();
        let salty = Teos10.potential_density(35.5, 28.0).unwrap();
        let cold = Teos10.potential_density(34.5, 10.0).unwrap();
        assert!(salty > warm);
        assert!(cold > warm);
        assert!((20.0..23.0).contains(&warm));
    }

    #[test]
    fn test_rejects_non_finite_and_negative() {
        assert!(matches!(
            Teos10.absolute_salinity(f64::NAN, 0.0, 0.0, 0.0),
            Err(SeawaterError::NonFiniteInput { name: "practical_salinity", .. })
        ));
        assert_eq!(
            Teos10.conservative_temperature(-1.0, 10.0, 0.0),
            Err(SeawaterError::NegativeSalinity(-1.0))
        );
        assert!(Teos10.potential_density(35.0, f64::INFINITY).is_err());
    }
}
