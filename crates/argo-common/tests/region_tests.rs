//! Coverage tests for ocean region classification.

use argo_common::region::{classify_region, OceanRegion};

// ============================================================================
// Totality and determinism
// ============================================================================

#[test]
fn test_every_position_gets_one_label() {
    let mut lat = -90.0;
    while lat <= 90.0 {
        let mut lon = -180.0;
        while lon <= 180.0 {
            let region = classify_region(lat, lon);
            assert!(OceanRegion::ALL.contains(&region));
            assert_eq!(region, classify_region(lat, lon));
            lon += 2.5;
        }
        lat += 2.5;
    }
}

#[test]
fn test_boundaries_are_inclusive() {
    assert_eq!(classify_region(-60.0, 20.0), OceanRegion::Indian);
    assert_eq!(classify_region(30.0, 120.0), OceanRegion::Indian);
    assert_eq!(classify_region(31.0, 120.0), OceanRegion::Pacific);
    assert_eq!(classify_region(-61.0, 70.0), OceanRegion::Pacific);
}

#[test]
fn test_antimeridian() {
    assert_eq!(classify_region(0.0, 180.0), OceanRegion::Pacific);
    assert_eq!(classify_region(0.0, -180.0), OceanRegion::Pacific);
}

// ============================================================================
// Known positions
// ============================================================================

#[test]
fn test_bay_of_bengal() {
    assert_eq!(classify_region(15.0, 88.0), OceanRegion::Indian);
}

#[test]
fn test_equatorial_pacific() {
    assert_eq!(classify_region(0.0, -140.0), OceanRegion::Pacific);
    assert_eq!(classify_region(-10.0, 160.0), OceanRegion::Pacific);
}

#[test]
fn test_weddell_sector_between_bands() {
    assert_eq!(classify_region(-65.0, 90.0), OceanRegion::Southern);
}

#[test]
fn test_siberian_shelf_between_bands() {
    assert_eq!(classify_region(78.0, 110.0), OceanRegion::Arctic);
}
