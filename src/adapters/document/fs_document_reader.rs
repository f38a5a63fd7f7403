//! Filesystem reader for decision record documents.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::foundation::EngineError;
use crate::ports::{DocumentReader, RawDocument};

/// Reads every `*.md` file from a single directory. Files are returned in
/// filename order, which gives the corpus a stable ordering across runs.
#[derive(Debug, Clone)]
pub struct FsDocumentReader {
    directory: PathBuf,
}

impl FsDocumentReader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl DocumentReader for FsDocumentReader {
    async fn read_all(&self) -> Result<Vec<RawDocument>, EngineError> {
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(EngineError::storage)?;

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(EngineError::storage)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("md") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    warn!(path = %path.display(), "skipping document with non-utf8 name");
                    continue;
                }
            };
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(EngineError::storage)?;
            let last_modified = tokio::fs::metadata(&path)
                .await
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            documents.push(RawDocument {
                file_name,
                content,
                last_modified,
            });
        }

        Ok(documents)
    }
}
