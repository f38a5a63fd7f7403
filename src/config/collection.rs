//! Collection pass configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Tuning for evidence collection passes
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Per-source call timeout in seconds
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u64,
}

impl CollectionConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    /// Validate collection configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_timeout_secs == 0 || self.source_timeout_secs > 300 {
            return Err(ValidationError::InvalidSourceTimeout);
        }
        Ok(())
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            source_timeout_secs: default_source_timeout(),
        }
    }
}

fn default_source_timeout() -> u64 {
    10
}
