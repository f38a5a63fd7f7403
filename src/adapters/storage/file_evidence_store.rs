//! File-backed evidence collection history.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::evidence::EvidenceCollection;
use crate::domain::foundation::{DecisionId, EngineError};
use crate::ports::EvidenceStore;

/// One JSON file per collection, named `{decision_id}_{timestamp}.json`.
/// The timestamp segment sorts lexicographically in date order, so listing
/// a decision's history is a filename sort rather than a parse of every
/// file's contents.
#[derive(Debug, Clone)]
pub struct FileEvidenceStore {
    directory: PathBuf,
}

impl FileEvidenceStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn file_name(collection: &EvidenceCollection) -> String {
        format!(
            "{}_{}.json",
            collection.decision_id,
            collection.collection_date.format("%Y%m%dT%H%M%S%3f")
        )
    }
}

#[async_trait]
impl EvidenceStore for FileEvidenceStore {
    async fn append(&self, collection: &EvidenceCollection) -> Result<(), EngineError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(EngineError::storage)?;
        let path = self.directory.join(Self::file_name(collection));
        let raw = serde_json::to_string_pretty(collection).map_err(EngineError::storage)?;
        tokio::fs::write(&path, raw)
            .await
            .map_err(EngineError::storage)
    }

    async fn list_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Vec<EvidenceCollection>, EngineError> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(EngineError::storage(err)),
        };

        let prefix = format!("{}_", decision_id);
        let mut names: Vec<String> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(EngineError::storage)? {
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(&prefix) && name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut collections = Vec::with_capacity(names.len());
        for name in names {
            let raw = tokio::fs::read_to_string(self.directory.join(&name))
                .await
                .map_err(EngineError::storage)?;
            match serde_json::from_str(&raw) {
                Ok(collection) => collections.push(collection),
                Err(err) => {
                    warn!(file = %name, error = %err, "skipping unreadable evidence file");
                }
            }
        }
        Ok(collections)
    }
}
