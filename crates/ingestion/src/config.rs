//! Ingestion configuration.

use netcdf_parser::ExtractOptions;

use crate::derive::DerivationConfig;
use crate::error::{IngestionError, Result};

/// Extension of ARGO profile files.
pub const DEFAULT_FILE_EXTENSION: &str = "nc";

/// Settings for one [`Ingester`](crate::Ingester).
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Extension (without dot) of files picked up by directory ingestion.
    pub file_extension: String,
    pub extract: ExtractOptions,
    pub derivation: DerivationConfig,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            extract: ExtractOptions::default(),
            derivation: DerivationConfig::default(),
        }
    }
}

impl IngestionConfig {
    /// Reject settings that would make every profile fail or pass trivially.
    pub fn validate(&self) -> Result<()> {
        if self.file_extension.trim_start_matches('.').is_empty() {
            return Err(IngestionError::InvalidConfig(
                "file extension must not be empty".to_string(),
            ));
        }
        let threshold = self.derivation.mld_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(IngestionError::InvalidConfig(format!(
                "mixed-layer threshold must be positive, got {}",
                threshold
            )));
        }
        if self.derivation.min_valid_samples == 0 {
            return Err(IngestionError::InvalidConfig(
                "minimum valid samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = IngestionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.file_extension, "nc");
        assert_eq!(config.derivation.mld_threshold, 0.2);
        assert_eq!(config.derivation.min_valid_samples, 3);
    }

    #[test]
    fn test_invalid_settings() {
        let mut config = IngestionConfig::default();
        config.derivation.mld_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = IngestionConfig::default();
        config.file_extension = ".".to_string();
        assert!(config.validate().is_err());

        let mut config = IngestionConfig::default();
        config.derivation.min_valid_samples = 0;
        assert!(config.validate().is_err());
    }
}
