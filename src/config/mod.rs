//! Engine configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `ADR_PULSE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use adr_pulse::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Reading decisions from {}", config.corpus.dir.display());
//! ```

mod collection;
mod corpus;
mod error;
mod storage;

pub use collection::CollectionConfig;
pub use corpus::CorpusConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root engine configuration
///
/// Every section has working defaults, so a bare environment loads a
/// usable development configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Corpus location (decision documents)
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Engine-owned storage (metric configs, evidence history)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Collection pass tuning
    #[serde(default)]
    pub collection: CollectionConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `ADR_PULSE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ADR_PULSE__CORPUS__DIR=docs/adr` -> `corpus.dir = docs/adr`
    /// - `ADR_PULSE__COLLECTION__SOURCE_TIMEOUT_SECS=30`
    ///   -> `collection.source_timeout_secs = 30`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ADR_PULSE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.corpus.validate()?;
        self.storage.validate()?;
        self.collection.validate()?;
        Ok(())
    }
}
