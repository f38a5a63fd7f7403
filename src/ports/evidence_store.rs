//! Port for the append-only evidence collection history.

use async_trait::async_trait;

use crate::domain::evidence::EvidenceCollection;
use crate::domain::foundation::{DecisionId, EngineError};

/// Port for persisted evidence collections, keyed by
/// (decision id, collection date). Append-only: the engine never mutates
/// or deletes a stored collection.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Appends one collection to the history.
    async fn append(&self, collection: &EvidenceCollection) -> Result<(), EngineError>;

    /// All collections for a decision, collection date ascending.
    async fn list_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Vec<EvidenceCollection>, EngineError>;

    /// The most recent `limit` collections for a decision, newest first.
    async fn recent_for_decision(
        &self,
        decision_id: &DecisionId,
        limit: usize,
    ) -> Result<Vec<EvidenceCollection>, EngineError> {
        let mut all = self.list_for_decision(decision_id).await?;
        all.reverse();
        all.truncate(limit);
        Ok(all)
    }
}
