//! Trend analysis over a decision's stored collection history.

use std::sync::Arc;

use tracing::debug;

use crate::domain::analysis::{analyze_series, TrendAnalysis};
use crate::domain::foundation::{DecisionId, EngineError};
use crate::domain::metrics::MetricConfiguration;
use crate::ports::EvidenceStore;

/// Fewest collections a decision needs before any trend is reported.
const MIN_COLLECTIONS: usize = 2;

/// Recomputes trend signals from the evidence history. Nothing here is
/// persisted; every call reads the stored collections afresh.
pub struct TrendAnalyzer {
    evidence_store: Arc<dyn EvidenceStore>,
}

impl TrendAnalyzer {
    pub fn new(evidence_store: Arc<dyn EvidenceStore>) -> Self {
        Self { evidence_store }
    }

    /// One `TrendAnalysis` per configured metric that has at least two
    /// historical values. A decision with fewer than two collections
    /// reports no trends at all.
    pub async fn analyze(
        &self,
        decision_id: &DecisionId,
        configs: &[MetricConfiguration],
        period: &str,
    ) -> Result<Vec<TrendAnalysis>, EngineError> {
        let collections = self.evidence_store.list_for_decision(decision_id).await?;
        if collections.len() < MIN_COLLECTIONS {
            debug!(decision = %decision_id, collections = collections.len(), "history too short for trends");
            return Ok(Vec::new());
        }

        let mut analyses = Vec::new();
        for config in configs {
            let series: Vec<f64> = collections
                .iter()
                .filter_map(|c| c.metric_value(&config.id))
                .collect();
            if series.len() < MIN_COLLECTIONS {
                continue;
            }
            analyses.push(analyze_series(config.name.clone(), period, &series));
        }
        Ok(analyses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryEvidenceStore;
    use crate::domain::decision::TrendDirection;
    use crate::domain::evidence::{
        CollectedMetric, CollectionSummary, EvidenceCollection, HealthLevel,
    };
    use crate::domain::foundation::{CollectionId, MetricConfigId};
    use crate::domain::metrics::default_configurations;
    use chrono::{TimeZone, Utc};

    async fn store_with_series(
        decision_id: &DecisionId,
        config_id: &str,
        values: &[f64],
    ) -> Arc<InMemoryEvidenceStore> {
        let store = Arc::new(InMemoryEvidenceStore::new());
        for (day, value) in values.iter().enumerate() {
            store
                .append(&EvidenceCollection {
                    id: CollectionId::new(),
                    decision_id: decision_id.clone(),
                    collection_date: Utc
                        .with_ymd_and_hms(2025, 3, day as u32 + 1, 9, 0, 0)
                        .unwrap(),
                    metrics: vec![CollectedMetric {
                        config_id: MetricConfigId::new(config_id),
                        value: *value,
                        unit: "%".into(),
                        timestamp: Utc::now(),
                        source: "log".into(),
                        confidence: 85,
                        trend: TrendDirection::Stable,
                        compared_to_previous: 0.0,
                    }],
                    incidents: vec![],
                    feedback: vec![],
                    performance: vec![],
                    costs: vec![],
                    summary: CollectionSummary {
                        overall_health: HealthLevel::Good,
                        key_findings: vec![],
                        recommendations: vec![],
                        trends_detected: vec![],
                    },
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn short_history_reports_no_trends() {
        let id: DecisionId = "ADR-0001".parse().unwrap();
        let store = store_with_series(&id, "build-success-rate", &[90.0]).await;
        let analyzer = TrendAnalyzer::new(store);

        let analyses = analyzer
            .analyze(&id, &default_configurations(), "30d")
            .await
            .unwrap();
        assert!(analyses.is_empty());
    }

    #[tokio::test]
    async fn steady_series_is_classified_from_history() {
        let id: DecisionId = "ADR-0001".parse().unwrap();
        let store =
            store_with_series(&id, "build-success-rate", &[90.0, 91.0, 92.0, 93.0]).await;
        let analyzer = TrendAnalyzer::new(store);

        let analyses = analyzer
            .analyze(&id, &default_configurations(), "30d")
            .await
            .unwrap();

        assert_eq!(analyses.len(), 1);
        let analysis = &analyses[0];
        assert_eq!(analysis.metric, "Build Success Rate");
        assert_eq!(analysis.trend, TrendDirection::Improving);
        assert_eq!(analysis.data_points, 4);
        assert_eq!(analysis.confidence, 40);
        assert!(analysis.forecast.is_some());
    }

    #[tokio::test]
    async fn metrics_absent_from_history_are_skipped() {
        let id: DecisionId = "ADR-0001".parse().unwrap();
        let store = store_with_series(&id, "error-rate", &[1.0, 1.0, 1.0]).await;
        let analyzer = TrendAnalyzer::new(store);

        let analyses = analyzer
            .analyze(&id, &default_configurations(), "30d")
            .await
            .unwrap();

        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].metric, "Error Rate");
        assert_eq!(analyses[0].trend, TrendDirection::Stable);
    }
}
