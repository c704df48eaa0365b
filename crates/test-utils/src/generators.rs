//! Synthetic profile generators.
//!
//! These build physically plausible profiles with known structure, so tests
//! can check derived quantities (mixed-layer depth, density ordering) against
//! values fixed at construction time.

use argo_common::RawProfile;
use chrono::{DateTime, Utc};

/// Parameters for a two-layer stratified profile.
#[derive(Debug, Clone, Copy)]
pub struct Stratification {
    /// Temperature of the mixed layer (°C)
    pub surface_temperature: f64,
    /// Salinity of the mixed layer (PSU)
    pub surface_salinity: f64,
    /// Depth of the base of the mixed layer (dbar)
    pub mixed_layer_depth: f64,
    /// Temperature decrease per dbar below the mixed layer
    pub temperature_gradient: f64,
    /// Salinity increase per dbar below the mixed layer
    pub salinity_gradient: f64,
}

impl Default for Stratification {
    fn default() -> Self {
        Self {
            surface_temperature: 25.0,
            surface_salinity: 34.5,
            mixed_layer_depth: 40.0,
            temperature_gradient: 0.05,
            salinity_gradient: 0.002,
        }
    }
}

/// Creates evenly spaced pressure levels starting at `start`.
///
/// # Example
///
/// ```
/// use test_utils::generators::pressure_levels;
///
/// let levels = pressure_levels(5.0, 10.0, 4);
/// assert_eq!(levels, vec![5.0, 15.0, 25.0, 35.0]);
/// ```
pub fn pressure_levels(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Creates a stratified profile on the given pressure levels.
///
/// Temperature and salinity are constant down to
/// `mixed_layer_depth` and change linearly below it.
pub fn stratified_profile(
    platform: &str,
    cycle: i32,
    position: (f64, f64),
    date: DateTime<Utc>,
    pressure: Vec<f64>,
    strat: Stratification,
) -> RawProfile {
    let below = |p: f64| (p - strat.mixed_layer_depth).max(0.0);
    let temperature = pressure
        .iter()
        .map(|&p| strat.surface_temperature - strat.temperature_gradient * below(p))
        .collect();
    let salinity = pressure
        .iter()
        .map(|&p| strat.surface_salinity + strat.salinity_gradient * below(p))
        .collect();

    RawProfile::new(
        platform,
        cycle,
        position.0,
        position.1,
        date,
        pressure,
        temperature,
        salinity,
    )
    .expect("generated sequences have equal length")
}

/// Creates `count` distinct profiles for one platform, cycles `1..=count`.
///
/// Positions step eastwards across the Indian Ocean band so every profile
/// classifies the same way.
pub fn profile_series(platform: &str, count: usize, date: DateTime<Utc>) -> Vec<RawProfile> {
    (0..count)
        .map(|i| {
            stratified_profile(
                platform,
                i as i32 + 1,
                (-10.0, 60.0 + i as f64),
                date + chrono::Duration::days(10 * i as i64),
                pressure_levels(5.0, 10.0, 20),
                Stratification::default(),
            )
        })
        .collect()
}
