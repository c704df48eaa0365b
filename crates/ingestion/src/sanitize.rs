//! Conversion into serialization-safe records.
//!
//! NaN has no JSON or SQL representation the downstream stores accept, so
//! every missing value becomes `None` here.

use argo_common::{DerivedProfile, ProfileRecord, QcFlag, DEFAULT_DATA_SOURCE};

/// Produce a [`ProfileRecord`] with no NaN anywhere.
///
/// Applying it to a record that is already sanitized returns an equal record.
pub trait Sanitize {
    fn sanitize(&self) -> ProfileRecord;
}

fn present(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn present_all(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(present).collect()
}

fn clean(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.and_then(present)).collect()
}

impl Sanitize for DerivedProfile {
    fn sanitize(&self) -> ProfileRecord {
        let raw = &self.raw;
        let derived = &self.derived;
        let qc = |flags: Option<&[Option<QcFlag>]>| flags.map(<[_]>::to_vec).unwrap_or_default();

        ProfileRecord {
            platform_number: raw.platform_number.clone(),
            cycle_number: raw.cycle_number,
            latitude: raw.latitude,
            longitude: raw.longitude,
            measurement_date: raw.measurement_date,
            pressure_levels: present_all(raw.pressure()),
            temperature: present_all(raw.temperature()),
            salinity: present_all(raw.salinity()),
            temp_qc: qc(raw.temp_qc()),
            psal_qc: qc(raw.psal_qc()),
            absolute_salinity: present_all(&derived.absolute_salinity),
            conservative_temperature: present_all(&derived.conservative_temperature),
            potential_density: present_all(&derived.potential_density),
            mixed_layer_depth: present(derived.mixed_layer_depth),
            max_depth: present(derived.max_depth),
            ocean_region: self.ocean_region,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            metadata: serde_json::Value::Object(Default::default()),
        }
    }
}

impl Sanitize for ProfileRecord {
    fn sanitize(&self) -> ProfileRecord {
        ProfileRecord {
            pressure_levels: clean(&self.pressure_levels),
            temperature: clean(&self.temperature),
            salinity: clean(&self.salinity),
            absolute_salinity: clean(&self.absolute_salinity),
            conservative_temperature: clean(&self.conservative_temperature),
            potential_density: clean(&self.potential_density),
            mixed_layer_depth: self.mixed_layer_depth.and_then(present),
            max_depth: self.max_depth.and_then(present),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argo_common::{DerivedFields, OceanRegion};
    use test_utils::fixtures;

    fn gappy() -> DerivedProfile {
        DerivedProfile::new(
            fixtures::gappy_profile(),
            DerivedFields {
                valid_levels: vec![0, 3, 5],
                absolute_salinity: vec![35.1, f64::NAN, 35.4],
                conservative_temperature: vec![26.5, 24.0, 18.0],
                potential_density: vec![22.8, 23.6, 25.6],
                mixed_layer_depth: f64::NAN,
                max_depth: 150.0,
            },
            OceanRegion::Indian,
        )
    }

    #[test]
    fn test_nan_becomes_none() {
        let record = gappy().sanitize();

        assert_eq!(record.pressure_levels[1], None);
        assert_eq!(record.temperature[2], None);
        assert_eq!(record.salinity[4], None);
        assert_eq!(record.absolute_salinity[1], None);
        assert_eq!(record.mixed_layer_depth, None);
        assert_eq!(record.max_depth, Some(150.0));
        assert_eq!(record.pressure_levels[0], Some(5.0));
    }

    #[test]
    fn test_serializes_without_nan() {
        let json = serde_json::to_string(&gappy().sanitize()).unwrap();
        assert!(!json.contains("NaN"));
        assert!(json.contains("null"));
        assert!(json.contains("\"Indian Ocean\""));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = gappy().sanitize();
        let twice = once.sanitize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_record_nan_inside_some_is_cleaned() {
        let mut record = gappy().sanitize();
        record.temperature[0] = Some(f64::NAN);
        record.max_depth = Some(f64::INFINITY);

        let cleaned = record.sanitize();
        assert_eq!(cleaned.temperature[0], None);
        assert_eq!(cleaned.max_depth, None);
    }

    #[test]
    fn test_missing_qc_is_empty() {
        let record = DerivedProfile::new(
            fixtures::scenario_profile(),
            DerivedFields::fallback(),
            OceanRegion::Indian,
        )
        .sanitize();

        assert!(record.temp_qc.is_empty());
        assert_eq!(record.mixed_layer_depth, Some(0.0));
        assert_eq!(record.data_source, "ARGO");
    }
}
