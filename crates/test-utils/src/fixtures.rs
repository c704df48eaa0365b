//! Common test fixtures for ARGO ingestion tests.
//!
//! This module provides pre-defined profiles that represent the scenarios the
//! pipeline has to handle: a clean tropical profile, degenerate profiles, gaps,
//! and a duplicate pair.

use argo_common::{QcFlag, RawProfile};
use chrono::{DateTime, TimeZone, Utc};

/// Well-known float positions.
pub mod positions {
    /// Bay of Bengal
    pub const BAY_OF_BENGAL: (f64, f64) = (15.0, 88.0);

    /// Equatorial Indian Ocean, the position of the reference scenario
    pub const EQUATORIAL_INDIAN: (f64, f64) = (2.5, 87.3);

    /// Central equatorial Pacific
    pub const EQUATORIAL_PACIFIC: (f64, f64) = (0.0, -140.0);

    /// Weddell sector, south of the Indian band
    pub const WEDDELL: (f64, f64) = (-65.0, 90.0);

    /// Fram Strait
    pub const FRAM_STRAIT: (f64, f64) = (79.0, 0.0);
}

/// Platform and cycle of the reference scenario.
pub const SCENARIO_PLATFORM: &str = "2900123";
pub const SCENARIO_CYCLE: i32 = 10;

/// Measurement date of the reference scenario (JULD 26828.5).
pub fn scenario_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0)
        .single()
        .expect("valid fixture date")
}

/// The reference tropical profile: four levels, warm fresh surface layer.
///
/// Pressure `[2.5, 10, 20, 50]`, temperature `[28.0, 27.9, 26.0, 20.0]`,
/// salinity `[34.2, 34.3, 34.8, 35.1]` at 2.5°N 87.3°E.
pub fn scenario_profile() -> RawProfile {
    let (lat, lon) = positions::EQUATORIAL_INDIAN;
    RawProfile::new(
        SCENARIO_PLATFORM,
        SCENARIO_CYCLE,
        lat,
        lon,
        scenario_date(),
        vec![2.5, 10.0, 20.0, 50.0],
        vec![28.0, 27.9, 26.0, 20.0],
        vec![34.2, 34.3, 34.8, 35.1],
    )
    .expect("valid fixture profile")
}

/// The reference profile with the deepest temperature sample flagged bad.
pub fn scenario_profile_with_bad_qc() -> RawProfile {
    let good = Some(QcFlag::Good);
    scenario_profile()
        .with_qc(
            Some(vec![good, good, good, Some(QcFlag::Bad)]),
            Some(vec![good; 4]),
        )
        .expect("valid fixture qc")
}

/// A well-mixed profile: constant temperature and salinity with depth.
pub fn constant_profile() -> RawProfile {
    RawProfile::new(
        "5904471",
        3,
        -20.0,
        75.0,
        scenario_date(),
        vec![5.0, 50.0, 100.0, 200.0, 500.0],
        vec![18.0; 5],
        vec![35.0; 5],
    )
    .expect("valid fixture profile")
}

/// A profile with a single sampling level.
pub fn single_level_profile() -> RawProfile {
    RawProfile::new(
        "2902746",
        1,
        10.0,
        65.0,
        scenario_date(),
        vec![5.0],
        vec![27.0],
        vec![35.5],
    )
    .expect("valid fixture profile")
}

/// A profile with missing samples scattered across all three variables.
///
/// Only levels 0, 3 and 5 are jointly valid.
pub fn gappy_profile() -> RawProfile {
    let nan = f64::NAN;
    RawProfile::new(
        "2902100",
        44,
        -5.0,
        70.0,
        scenario_date(),
        vec![5.0, nan, 30.0, 60.0, 100.0, 150.0],
        vec![26.5, 26.4, nan, 24.0, 22.0, 18.0],
        vec![34.9, 35.0, 35.0, 35.2, nan, 35.3],
    )
    .expect("valid fixture profile")
}

/// A profile where every sample is missing.
pub fn empty_profile() -> RawProfile {
    RawProfile::new(
        "2902101",
        2,
        -5.0,
        70.0,
        scenario_date(),
        vec![f64::NAN; 3],
        vec![f64::NAN; 3],
        vec![f64::NAN; 3],
    )
    .expect("valid fixture profile")
}

/// Two copies of the reference profile with different measurement dates.
///
/// The first element is the newer one.
pub fn duplicate_pair() -> (RawProfile, RawProfile) {
    let newer = scenario_profile();
    let mut older = scenario_profile();
    older.measurement_date = scenario_date() - chrono::Duration::days(1);
    (newer, older)
}
