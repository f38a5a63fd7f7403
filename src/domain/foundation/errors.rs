//! Error types for the engine.
//!
//! Failure handling follows a fixed taxonomy: corpus-load and
//! collection-time problems are recovered locally and logged, while only
//! caller-supplied invalid identifiers propagate to the caller. Nothing in
//! this engine is fatal to the process.

use thiserror::Error;

/// Errors surfaced by the engine's public operations.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// An unknown decision id was passed to a per-decision operation.
    #[error("Decision not found: {id}")]
    DecisionNotFound { id: String },

    /// A string did not match the `PREFIX-NNNN` decision id form.
    #[error("Invalid decision id: '{id}'")]
    InvalidDecisionId { id: String },

    /// A document could not be turned into a decision record. Recovered at
    /// corpus-load time: the document is skipped and loading continues.
    #[error("Failed to parse '{file}': {reason}")]
    ParseFailure { file: String, reason: String },

    /// A data-source call failed, timed out, or produced unparsable output.
    /// Isolated to the one metric; the collection pass continues.
    #[error("Metric '{config_id}' unavailable: {reason}")]
    MetricUnavailable { config_id: String, reason: String },

    /// A storage adapter failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Creates a storage error from any displayable cause.
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        EngineError::Storage(cause.to_string())
    }

    /// Creates a not-found error for a decision id.
    pub fn not_found(id: impl Into<String>) -> Self {
        EngineError::DecisionNotFound { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_not_found_names_the_id() {
        let err = EngineError::not_found("ADR-0042");
        assert_eq!(err.to_string(), "Decision not found: ADR-0042");
    }

    #[test]
    fn parse_failure_names_the_file() {
        let err = EngineError::ParseFailure {
            file: "notes.md".into(),
            reason: "filename has no sequence number".into(),
        };
        assert!(err.to_string().contains("notes.md"));
    }

    #[test]
    fn metric_unavailable_names_the_config() {
        let err = EngineError::MetricUnavailable {
            config_id: "build-time".into(),
            reason: "timed out".into(),
        };
        assert!(err.to_string().contains("build-time"));
        assert!(err.to_string().contains("timed out"));
    }
}
