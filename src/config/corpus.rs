//! Corpus location configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::ValidationError;

/// Where the decision documents live
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding the `*.md` decision documents
    #[serde(default = "default_corpus_dir")]
    pub dir: PathBuf,
}

impl CorpusConfig {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate corpus configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyCorpusDir);
        }
        Ok(())
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
        }
    }
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("docs/decisions")
}
