//! Ingestion orchestrator for ARGO profile files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use argo_common::{
    classify_region, DerivedFields, DerivedProfile, ProfileRecord, QcFlag, ValidSubset,
};
use netcdf_parser::{extract_profile, ProfileReader};
use storage::{ProfileStore, SearchHit, SearchIndex};

use crate::config::IngestionConfig;
use crate::derive::derive;
use crate::error::{IngestionError, Result};
use crate::metadata::{has_extension, list_profile_files, parse_argo_filename};
use crate::sanitize::Sanitize;
use crate::seawater::{SeawaterEquations, Teos10};
use crate::summary::search_document;

/// Outcome of a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    /// Files stored in both the profile store and the search index
    pub processed: usize,
    /// Files that failed at any stage, plus one for an unreadable directory
    pub errors: usize,
    /// Paths of the processed files, in processing order
    pub files: Vec<PathBuf>,
}

/// Counts reported by [`Ingester::get_ingestion_stats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionStats {
    pub total_profiles: u64,
    pub indexed_documents: u64,
    pub regional_distribution: BTreeMap<String, u64>,
    pub search_backend: String,
}

/// Runs files through extraction, derivation, classification and
/// sanitization, then persists each record to the store and the index.
///
/// Files are handled strictly one after another. A failing file is counted
/// and logged; it never stops the batch.
pub struct Ingester {
    reader: Arc<dyn ProfileReader>,
    store: Arc<dyn ProfileStore>,
    index: Arc<dyn SearchIndex>,
    equations: Arc<dyn SeawaterEquations>,
    config: IngestionConfig,
}

impl Ingester {
    /// Create a new Ingester using the built-in seawater equations.
    pub fn new(
        reader: Arc<dyn ProfileReader>,
        store: Arc<dyn ProfileStore>,
        index: Arc<dyn SearchIndex>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            reader,
            store,
            index,
            equations: Arc::new(Teos10),
            config,
        }
    }

    /// Replace the seawater equations.
    pub fn with_equations(mut self, equations: Arc<dyn SeawaterEquations>) -> Self {
        self.equations = equations;
        self
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Ingest every profile file directly inside `dir`, in file-name order.
    ///
    /// Never fails: an unreadable directory is reported as one error.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn ingest_directory(&self, dir: &Path) -> IngestionSummary {
        let files = match list_profile_files(dir, &self.config.file_extension) {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "Failed to list directory");
                return IngestionSummary {
                    processed: 0,
                    errors: 1,
                    files: Vec::new(),
                };
            }
        };

        if files.is_empty() {
            warn!(
                extension = %self.config.file_extension,
                "No profile files found"
            );
            return IngestionSummary::default();
        }

        info!(count = files.len(), "Ingesting profile files");

        let mut summary = IngestionSummary::default();
        for path in files {
            if self.ingest_single_file(&path).await {
                summary.processed += 1;
                summary.files.push(path);
            } else {
                summary.errors += 1;
            }
        }

        info!(
            processed = summary.processed,
            errors = summary.errors,
            "Directory ingestion complete"
        );
        summary
    }

    /// Ingest one file. Returns true only if both the store and the index
    /// accepted the record.
    #[instrument(skip(self, path), fields(file = %path.display()))]
    pub async fn ingest_single_file(&self, path: &Path) -> bool {
        let record = match self.process_file(path) {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Failed to process file");
                return false;
            }
        };

        let id = match self.store.insert_profile(&record).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Failed to store profile");
                return false;
            }
        };

        if let Err(e) = self.index.add_document(search_document(id, &record)).await {
            // The stored row is kept; the file still counts as failed.
            error!(profile_id = %id, error = %e, "Failed to index profile");
            return false;
        }

        info!(
            profile_id = %id,
            platform = %record.platform_number,
            cycle = record.cycle_number,
            region = %record.ocean_region,
            "Ingested profile"
        );
        true
    }

    /// Extract, derive, classify and sanitize one file without persisting it.
    pub fn process_file(&self, path: &Path) -> Result<ProfileRecord> {
        if !has_extension(path, &self.config.file_extension) {
            return Err(IngestionError::UnsupportedFile(path.display().to_string()));
        }

        let raw = {
            let source = self.reader.open(path)?;
            extract_profile(source.as_ref(), &self.config.extract)?
        };

        let region = classify_region(raw.latitude, raw.longitude);

        let (derived, warning) =
            match derive(&raw, &self.config.derivation, self.equations.as_ref()) {
                Ok(derived) => (derived, None),
                Err(w) => {
                    warn!(
                        file = %path.display(),
                        platform = %raw.platform_number,
                        warning = %w,
                        "Derivation failed, using fallback values"
                    );
                    (DerivedFields::fallback(), Some(w.to_string()))
                }
            };

        let profile = DerivedProfile::new(raw, derived, region);
        let used = profile.valid_subset();
        debug!(
            levels = profile.raw.n_levels(),
            valid = used.pressure.len(),
            fallback = profile.derived.is_fallback(),
            region = %region,
            "Derived profile"
        );

        let mut record = profile.sanitize();
        record.metadata = file_metadata(path, &record, &used, warning);
        Ok(record)
    }

    /// Totals from the store and the index.
    pub async fn get_ingestion_stats(&self) -> Result<IngestionStats> {
        Ok(IngestionStats {
            total_profiles: self.store.count_profiles().await?,
            indexed_documents: self.index.count().await?,
            regional_distribution: self.store.regional_distribution().await?,
            search_backend: self.index.backend_name().to_string(),
        })
    }

    /// Keep only the latest measurement of each (platform, cycle) pair.
    ///
    /// Stale profiles are removed from the store in one batch, so a failure
    /// leaves the store untouched. Returns the number of profiles removed.
    /// Index documents of removed profiles are deleted on a best-effort basis.
    #[instrument(skip(self))]
    pub async fn cleanup_duplicates(&self) -> Result<usize> {
        let groups = self.store.duplicate_groups().await?;
        let mut stale = Vec::new();

        for group in groups {
            let profiles = self
                .store
                .profiles_for(&group.platform_number, group.cycle_number)
                .await?;
            stale.extend(profiles.iter().skip(1).map(|p| p.id));

            debug!(
                platform = %group.platform_number,
                cycle = group.cycle_number,
                count = group.count,
                "Found duplicate group"
            );
        }

        if stale.is_empty() {
            info!("No duplicate profiles");
            return Ok(0);
        }

        let removed = self.store.delete_profiles(&stale).await? as usize;

        for id in &stale {
            if let Err(e) = self.index.remove_document(*id).await {
                warn!(profile_id = %id, error = %e, "Failed to remove index document");
            }
        }

        info!(removed = removed, "Duplicate cleanup complete");
        Ok(removed)
    }

    /// Ranked summaries matching a free-text query.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        Ok(self.index.search(query, limit).await?)
    }
}

/// Provenance stored alongside each record.
fn file_metadata(
    path: &Path,
    record: &ProfileRecord,
    used: &ValidSubset,
    derivation_warning: Option<String>,
) -> serde_json::Value {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut metadata = json!({
        "source_file": file_name,
        "qc_summary": {
            "temp": qc_counts(&record.temp_qc),
            "psal": qc_counts(&record.psal_qc),
        },
        "valid_samples": used.pressure.len(),
    });

    if let (Some(top), Some(bottom)) = (used.pressure.first(), used.pressure.last()) {
        metadata["valid_pressure_range"] = json!([top, bottom]);
    }

    if let Some(info) = parse_argo_filename(&file_name) {
        metadata["data_mode"] = json!(info.data_mode);
        metadata["descending"] = json!(info.descending);
    }
    if let Some(warning) = derivation_warning {
        metadata["derivation_warning"] = json!(warning);
    }
    metadata
}

fn qc_counts(flags: &[Option<QcFlag>]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for flag in flags {
        let label = flag.map(QcFlag::label).unwrap_or("unreadable");
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qc_counts() {
        let counts = qc_counts(&[Some(QcFlag::Good), Some(QcFlag::Good), None, Some(QcFlag::Bad)]);
        assert_eq!(counts.get("good"), Some(&2));
        assert_eq!(counts.get("bad"), Some(&1));
        assert_eq!(counts.get("unreadable"), Some(&1));
    }

    #[test]
    fn test_file_metadata() {
        let record = ProfileRecord {
            platform_number: "2900123".to_string(),
            cycle_number: 10,
            latitude: 2.5,
            longitude: 87.3,
            measurement_date: chrono::Utc::now(),
            pressure_levels: vec![],
            temperature: vec![],
            salinity: vec![],
            temp_qc: vec![Some(QcFlag::Good)],
            psal_qc: vec![],
            absolute_salinity: vec![],
            conservative_temperature: vec![],
            potential_density: vec![],
            mixed_layer_depth: None,
            max_depth: None,
            ocean_region: argo_common::OceanRegion::Indian,
            data_source: "ARGO".to_string(),
            metadata: serde_json::Value::Null,
        };

        let used = ValidSubset {
            pressure: vec![5.0, 150.0],
            temperature: vec![26.5, 18.0],
            salinity: vec![34.9, 35.3],
        };
        let metadata = file_metadata(
            Path::new("/data/D2900123_010D.nc"),
            &record,
            &used,
            Some("too few samples".to_string()),
        );
        assert_eq!(metadata["source_file"], "D2900123_010D.nc");
        assert_eq!(metadata["data_mode"], "D");
        assert_eq!(metadata["descending"], true);
        assert_eq!(metadata["qc_summary"]["temp"]["good"], 1);
        assert_eq!(metadata["derivation_warning"], "too few samples");
        assert_eq!(metadata["valid_samples"], 2);
        assert_eq!(metadata["valid_pressure_range"], json!([5.0, 150.0]));
    }

    #[test]
    fn test_file_metadata_without_valid_samples() {
        let record = DerivedProfile::new(
            test_utils::fixtures::single_level_profile(),
            DerivedFields::fallback(),
            argo_common::OceanRegion::Indian,
        )
        .sanitize();

        let used = ValidSubset {
            pressure: vec![],
            temperature: vec![],
            salinity: vec![],
        };
        let metadata = file_metadata(Path::new("R2902746_001.nc"), &record, &used, None);
        assert_eq!(metadata["valid_samples"], 0);
        assert!(metadata.get("valid_pressure_range").is_none());
    }
}
