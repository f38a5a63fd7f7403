//! Port for persisting metric configurations.

use async_trait::async_trait;

use crate::domain::foundation::EngineError;
use crate::domain::metrics::MetricConfiguration;

/// Port for the metric configuration document (one JSON array).
#[async_trait]
pub trait MetricConfigStore: Send + Sync {
    /// Loads the persisted configurations. `None` means nothing has been
    /// persisted yet, which triggers the bootstrap defaults.
    async fn load(&self) -> Result<Option<Vec<MetricConfiguration>>, EngineError>;

    /// Replaces the persisted configuration set.
    async fn save(&self, configs: &[MetricConfiguration]) -> Result<(), EngineError>;
}
