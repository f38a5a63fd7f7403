//! Port for reading the raw decision document corpus.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::EngineError;

/// One raw document before parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub file_name: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
}

/// Port for enumerating and reading decision documents.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Reads every document in the corpus. Order is the corpus order used
    /// for deterministic tie-breaking downstream.
    async fn read_all(&self) -> Result<Vec<RawDocument>, EngineError>;
}
