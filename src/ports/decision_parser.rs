//! Port for turning one raw document into a decision record.

use crate::domain::decision::DecisionRecord;
use crate::domain::foundation::EngineError;

use super::RawDocument;

/// Port for the document → record transformation. Pure over the document
/// text; failures are reported, never panicked.
pub trait DecisionParser: Send + Sync {
    /// Parses a raw document. Returns `EngineError::ParseFailure` when the
    /// filename carries no sequence number; all other absent fields
    /// degrade to documented defaults.
    fn parse(&self, document: &RawDocument) -> Result<DecisionRecord, EngineError>;
}
