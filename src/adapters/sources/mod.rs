//! Data-source adapters.
//!
//! Production deployments wire real git/log/survey integrations behind the
//! `MetricSource` and `SignalFeed` ports. The adapters here answer from
//! scripted fixtures, which is what the demo binary and the integration
//! tests run against.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::evidence::{CostRecord, FeedbackRecord, PerformanceRecord};
use crate::domain::foundation::{DecisionId, EngineError};
use crate::domain::metrics::SourceKind;
use crate::ports::{MetricSource, MetricSourceError, RawLogEntry, SignalFeed};

/// Metric source that answers each query from a fixed map. Unknown queries
/// fail the way a broken integration would, so collection-time error
/// isolation gets exercised.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMetricSource {
    responses: HashMap<String, String>,
}

impl ScriptedMetricSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the raw text returned for a query.
    pub fn with_response(mut self, query: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(query.into(), body.into());
        self
    }
}

#[async_trait]
impl MetricSource for ScriptedMetricSource {
    async fn fetch(&self, source: SourceKind, query: &str) -> Result<String, MetricSourceError> {
        match source {
            SourceKind::Api | SourceKind::Database => {
                return Err(MetricSourceError::Unsupported(source));
            }
            _ => {}
        }
        self.responses
            .get(query)
            .cloned()
            .ok_or_else(|| MetricSourceError::Failed(format!("no data for query '{}'", query)))
    }
}

/// Signal feed that returns the same canned records for every decision.
#[derive(Debug, Clone, Default)]
pub struct StaticSignalFeed {
    pub log_entries: Vec<RawLogEntry>,
    pub feedback: Vec<FeedbackRecord>,
    pub performance: Vec<PerformanceRecord>,
    pub costs: Vec<CostRecord>,
}

impl StaticSignalFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_entries(mut self, entries: Vec<RawLogEntry>) -> Self {
        self.log_entries = entries;
        self
    }

    pub fn with_feedback(mut self, feedback: Vec<FeedbackRecord>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_performance(mut self, performance: Vec<PerformanceRecord>) -> Self {
        self.performance = performance;
        self
    }

    pub fn with_costs(mut self, costs: Vec<CostRecord>) -> Self {
        self.costs = costs;
        self
    }
}

#[async_trait]
impl SignalFeed for StaticSignalFeed {
    async fn incident_log(
        &self,
        _decision_id: &DecisionId,
    ) -> Result<Vec<RawLogEntry>, EngineError> {
        Ok(self.log_entries.clone())
    }

    async fn feedback(&self, _decision_id: &DecisionId) -> Result<Vec<FeedbackRecord>, EngineError> {
        Ok(self.feedback.clone())
    }

    async fn performance(
        &self,
        _decision_id: &DecisionId,
    ) -> Result<Vec<PerformanceRecord>, EngineError> {
        Ok(self.performance.clone())
    }

    async fn costs(&self, _decision_id: &DecisionId) -> Result<Vec<CostRecord>, EngineError> {
        Ok(self.costs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_source_answers_registered_queries() {
        let source = ScriptedMetricSource::new().with_response("error-rate.log", "1.2\n0.8\n");
        let body = source.fetch(SourceKind::Log, "error-rate.log").await.unwrap();
        assert_eq!(body, "1.2\n0.8\n");
    }

    #[tokio::test]
    async fn scripted_source_fails_unknown_queries() {
        let source = ScriptedMetricSource::new();
        let result = source.fetch(SourceKind::Log, "missing.log").await;
        assert!(matches!(result, Err(MetricSourceError::Failed(_))));
    }

    #[tokio::test]
    async fn api_and_database_sources_are_unsupported() {
        let source = ScriptedMetricSource::new().with_response("q", "1");
        assert!(matches!(
            source.fetch(SourceKind::Api, "q").await,
            Err(MetricSourceError::Unsupported(SourceKind::Api))
        ));
        assert!(matches!(
            source.fetch(SourceKind::Database, "q").await,
            Err(MetricSourceError::Unsupported(SourceKind::Database))
        ));
    }
}
