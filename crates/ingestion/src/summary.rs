//! Searchable text summaries of ingested profiles.

use serde_json::json;
use uuid::Uuid;

use argo_common::{ProfileRecord, UNKNOWN_PLATFORM};
use storage::SearchDocument;

/// Mean temperature above which a profile is described as warm (°C).
const WARM_THRESHOLD: f64 = 20.0;
/// Mean salinity above which a profile is described as high-salinity (PSU).
const SALTY_THRESHOLD: f64 = 35.0;

fn platform(record: &ProfileRecord) -> &str {
    if record.platform_number.is_empty() {
        UNKNOWN_PLATFORM
    } else {
        &record.platform_number
    }
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64, f64)> {
    let (mut min, mut max, mut sum, mut n) = (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0usize);
    for v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        n += 1;
    }
    (n > 0).then(|| (min, max, sum / n as f64))
}

/// Free-text description of a profile for keyword search.
pub fn profile_summary(record: &ProfileRecord) -> String {
    let (Some((t_min, t_max, t_mean)), Some((s_min, s_max, s_mean))) =
        (range(record.temperatures()), range(record.salinities()))
    else {
        return format!("ARGO Float {} - incomplete data", platform(record));
    };

    let region = record.ocean_region.as_str();
    let warmth = if t_mean > WARM_THRESHOLD { "warm" } else { "cold" };
    let saltiness = if s_mean > SALTY_THRESHOLD { "high" } else { "low" };

    format!(
        "ARGO Float {platform} collected oceanographic data on {date} \
         at location {lat:.2}°N, {lon:.2}°E in the {region}.\n\
         Temperature profile: {t_min:.1}°C to {t_max:.1}°C\n\
         Salinity profile: {s_min:.2} to {s_max:.2} PSU\n\
         Maximum depth: {max_depth:.0}m\n\
         Mixed layer depth: {mld:.0}m\n\
         This profile shows {warmth} water conditions with {saltiness} salinity levels \
         typical of {region} waters.",
        platform = platform(record),
        date = record.measurement_date.format("%Y-%m-%d %H:%M:%S UTC"),
        lat = record.latitude,
        lon = record.longitude,
        max_depth = record.max_depth.unwrap_or(0.0),
        mld = record.mixed_layer_depth.unwrap_or(0.0),
    )
}

/// Index document for a stored profile.
pub fn search_document(id: Uuid, record: &ProfileRecord) -> SearchDocument {
    SearchDocument {
        id,
        text: profile_summary(record),
        metadata: json!({
            "profile_id": id.to_string(),
            "platform_number": record.platform_number,
            "cycle_number": record.cycle_number,
            "latitude": record.latitude,
            "longitude": record.longitude,
            "date": record.measurement_date.to_rfc3339(),
            "ocean_region": record.ocean_region.as_str(),
            "max_depth": record.max_depth.unwrap_or(0.0),
            "mixed_layer_depth": record.mixed_layer_depth.unwrap_or(0.0),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argo_common::{DerivedFields, DerivedProfile, OceanRegion};
    use test_utils::fixtures;

    use crate::sanitize::Sanitize;

    fn record() -> ProfileRecord {
        DerivedProfile::new(
            fixtures::scenario_profile(),
            DerivedFields {
                mixed_layer_depth: 20.0,
                max_depth: 50.0,
                ..DerivedFields::fallback()
            },
            OceanRegion::Indian,
        )
        .sanitize()
    }

    #[test]
    fn test_summary_mentions_key_facts() {
        let text = profile_summary(&record());

        assert!(text.starts_with("ARGO Float 2900123 collected oceanographic data on 2023-06-15"));
        assert!(text.contains("2.50°N, 87.30°E in the Indian Ocean"));
        assert!(text.contains("Temperature profile: 20.0°C to 28.0°C"));
        assert!(text.contains("Salinity profile: 34.20 to 35.10 PSU"));
        assert!(text.contains("Maximum depth: 50m"));
        assert!(text.contains("Mixed layer depth: 20m"));
        assert!(text.contains("warm water conditions with low salinity"));
    }

    #[test]
    fn test_summary_without_samples() {
        let mut record = record();
        record.temperature = vec![None; 4];
        assert_eq!(profile_summary(&record), "ARGO Float 2900123 - incomplete data");
    }

    #[test]
    fn test_document_metadata() {
        let id = Uuid::new_v4();
        let doc = search_document(id, &record());

        assert_eq!(doc.id, id);
        assert_eq!(doc.metadata["platform_number"], "2900123");
        assert_eq!(doc.metadata["ocean_region"], "Indian Ocean");
        assert_eq!(doc.metadata["max_depth"], 50.0);
    }
}
