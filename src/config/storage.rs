//! Storage location configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the engine persists its own data
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for engine-owned files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Path of the metric configuration file
    pub fn metric_config_path(&self) -> PathBuf {
        self.data_dir.join("metric-configs.json")
    }

    /// Directory holding evidence collection files
    pub fn evidence_dir(&self) -> PathBuf {
        self.data_dir.join("evidence")
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyDataDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".adr-pulse")
}
