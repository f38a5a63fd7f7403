//! Port for external metric data sources.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::metrics::SourceKind;

/// Errors from one data-source invocation. Always isolated to the one
/// metric being collected.
#[derive(Debug, Clone, Error)]
pub enum MetricSourceError {
    #[error("Source {0:?} is not implemented")]
    Unsupported(SourceKind),

    #[error("Source call failed: {0}")]
    Failed(String),

    #[error("Source call timed out after {0}s")]
    TimedOut(u64),
}

/// Port for invoking a data source with an opaque query and getting raw
/// text back. How the call happens (shell, HTTP, database) is the
/// adapter's business; the engine only parses the returned text.
#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch(&self, source: SourceKind, query: &str) -> Result<String, MetricSourceError>;
}
