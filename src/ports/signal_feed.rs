//! Port for qualitative signals gathered around a decision.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::evidence::{CostRecord, FeedbackRecord, PerformanceRecord};
use crate::domain::foundation::{DecisionId, EngineError};

/// One raw line from a commit/incident log, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLogEntry {
    pub message: String,
    pub date: DateTime<Utc>,
}

/// Port for the external collaborators that supply incidents, feedback,
/// performance, and cost observations. The engine accepts whatever typed
/// records they return.
#[async_trait]
pub trait SignalFeed: Send + Sync {
    /// Raw incident/commit log messages relevant to a decision, newest
    /// first. Severity filtering happens in the collector.
    async fn incident_log(&self, decision_id: &DecisionId)
        -> Result<Vec<RawLogEntry>, EngineError>;

    async fn feedback(&self, decision_id: &DecisionId)
        -> Result<Vec<FeedbackRecord>, EngineError>;

    async fn performance(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Vec<PerformanceRecord>, EngineError>;

    async fn costs(&self, decision_id: &DecisionId) -> Result<Vec<CostRecord>, EngineError>;
}
