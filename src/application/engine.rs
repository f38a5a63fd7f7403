//! The engine facade: one entry point over the corpus, evidence history,
//! and analytics.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::analysis::TrendAnalysis;
use crate::domain::decision::{DecisionRecord, EvidenceItem};
use crate::domain::evidence::EvidenceCollection;
use crate::domain::foundation::{DecisionId, EngineError};
use crate::domain::graph::DecisionLink;
use crate::domain::metrics::{default_configurations, MetricConfiguration};
use crate::ports::{
    DecisionParser, DocumentReader, EvidenceStore, MetricConfigStore, MetricSource, SignalFeed,
};

use super::analytics::{AnalyticsService, DecisionAnalytics, SearchFilters};
use super::analyzer::TrendAnalyzer;
use super::collector::EvidenceCollector;
use super::report::{DecisionReport, ReportFormat, ReportGenerator};
use super::repository::DecisionRepository;

/// Facade over every engine operation. Construct one per process and share
/// it; all operations take `&self`.
pub struct DecisionEngine {
    repository: Arc<DecisionRepository>,
    analytics: Arc<AnalyticsService>,
    analyzer: Arc<TrendAnalyzer>,
    collector: EvidenceCollector,
    report: ReportGenerator,
    config_store: Arc<dyn MetricConfigStore>,
    configs: RwLock<Option<Vec<MetricConfiguration>>>,
}

impl DecisionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Arc<dyn DocumentReader>,
        parser: Arc<dyn DecisionParser>,
        config_store: Arc<dyn MetricConfigStore>,
        evidence_store: Arc<dyn EvidenceStore>,
        metric_source: Arc<dyn MetricSource>,
        signal_feed: Arc<dyn SignalFeed>,
        source_timeout: Duration,
    ) -> Self {
        let repository = Arc::new(DecisionRepository::new(reader, parser));
        let analytics = Arc::new(AnalyticsService::new(repository.clone()));
        let analyzer = Arc::new(TrendAnalyzer::new(evidence_store.clone()));
        let collector = EvidenceCollector::new(
            repository.clone(),
            evidence_store.clone(),
            metric_source,
            signal_feed,
            source_timeout,
        );
        let report = ReportGenerator::new(
            repository.clone(),
            analytics.clone(),
            analyzer.clone(),
            evidence_store,
        );

        Self {
            repository,
            analytics,
            analyzer,
            collector,
            report,
            config_store,
            configs: RwLock::new(None),
        }
    }

    /// Reparses the corpus, replacing the previous snapshot. Returns the
    /// number of decisions loaded.
    pub async fn load_corpus(&self) -> Result<usize, EngineError> {
        self.repository.load_corpus().await
    }

    /// The active metric configurations, bootstrapping the default set the
    /// first time no stored configuration exists.
    pub async fn metric_configurations(&self) -> Result<Vec<MetricConfiguration>, EngineError> {
        if let Some(configs) = self.configs.read().await.as_ref() {
            return Ok(configs.clone());
        }

        let mut cached = self.configs.write().await;
        if let Some(configs) = cached.as_ref() {
            return Ok(configs.clone());
        }
        let configs = match self.config_store.load().await? {
            Some(configs) => configs,
            None => {
                let defaults = default_configurations();
                self.config_store.save(&defaults).await?;
                info!(configs = defaults.len(), "bootstrapped default metric configurations");
                defaults
            }
        };
        *cached = Some(configs.clone());
        Ok(configs)
    }

    pub async fn get_decision(&self, id: &DecisionId) -> Result<DecisionRecord, EngineError> {
        self.repository.get(id).await
    }

    pub async fn get_all_decisions(&self) -> Vec<DecisionRecord> {
        self.repository.all().await
    }

    pub async fn links_for(&self, id: &DecisionId) -> Result<Vec<DecisionLink>, EngineError> {
        self.repository.links_for(id).await
    }

    pub async fn search_decisions(&self, filters: &SearchFilters) -> Vec<DecisionRecord> {
        self.analytics.search(filters).await
    }

    pub async fn get_analytics(&self) -> DecisionAnalytics {
        self.analytics.overview().await
    }

    /// Appends a manually curated evidence item to a decision's snapshot.
    pub async fn add_evidence(
        &self,
        id: &DecisionId,
        item: EvidenceItem,
    ) -> Result<(), EngineError> {
        self.repository.append_evidence(id, item).await
    }

    /// Runs one collection pass for a decision.
    pub async fn collect(&self, id: &DecisionId) -> Result<EvidenceCollection, EngineError> {
        let configs = self.metric_configurations().await?;
        self.collector.collect(id, &configs).await
    }

    /// Recomputes trend signals from a decision's stored history.
    pub async fn analyze(
        &self,
        id: &DecisionId,
        period: &str,
    ) -> Result<Vec<TrendAnalysis>, EngineError> {
        // Unknown ids fail the same way here as everywhere else.
        self.repository.get(id).await?;
        let configs = self.metric_configurations().await?;
        self.analyzer.analyze(id, &configs, period).await
    }

    /// Builds and renders a report over the current corpus.
    pub async fn generate_report(&self, format: ReportFormat) -> Result<String, EngineError> {
        let report = self.report_snapshot(None).await?;
        ReportGenerator::render(&report, format)
    }

    /// Builds and renders a report scoped to one decision.
    pub async fn generate_decision_report(
        &self,
        id: &DecisionId,
        format: ReportFormat,
    ) -> Result<String, EngineError> {
        let report = self.report_snapshot(Some(id)).await?;
        ReportGenerator::render(&report, format)
    }

    /// The structured report snapshot, for callers that post-process it.
    pub async fn report_snapshot(
        &self,
        scope: Option<&DecisionId>,
    ) -> Result<DecisionReport, EngineError> {
        let configs = self.metric_configurations().await?;
        self.report.generate(&configs, scope).await
    }
}
