//! File-backed metric configuration storage.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::foundation::EngineError;
use crate::domain::metrics::MetricConfiguration;
use crate::ports::MetricConfigStore;

/// Stores the full configuration set as one pretty-printed JSON array. A
/// missing file reads as `None`, which tells the engine to bootstrap the
/// defaults.
#[derive(Debug, Clone)]
pub struct FileMetricConfigStore {
    path: PathBuf,
}

impl FileMetricConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetricConfigStore for FileMetricConfigStore {
    async fn load(&self) -> Result<Option<Vec<MetricConfiguration>>, EngineError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let configs = serde_json::from_str(&raw).map_err(EngineError::storage)?;
                Ok(Some(configs))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(EngineError::storage(err)),
        }
    }

    async fn save(&self, configs: &[MetricConfiguration]) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(EngineError::storage)?;
        }
        let raw = serde_json::to_string_pretty(configs).map_err(EngineError::storage)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(EngineError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::default_configurations;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMetricConfigStore::new(dir.path().join("configs.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMetricConfigStore::new(dir.path().join("data").join("configs.json"));

        let configs = default_configurations();
        store.save(&configs).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, configs);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileMetricConfigStore::new(path);
        assert!(matches!(store.load().await, Err(EngineError::Storage(_))));
    }
}
