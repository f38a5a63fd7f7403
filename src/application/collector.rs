//! Evidence collection passes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::decision::{EvidenceItem, TrendDirection};
use crate::domain::evidence::{
    CollectedMetric, EvidenceCollection, IncidentRecord, IncidentSeverity,
};
use crate::domain::foundation::{CollectionId, DecisionId, EngineError, MetricConfigId};
use crate::domain::metrics::{MetricConfiguration, MetricDirection, SourceKind};
use crate::domain::analysis::HealthScorer;
use crate::ports::{EvidenceStore, MetricSource, MetricSourceError, SignalFeed};

use super::repository::DecisionRepository;

/// Percent change beyond which a collected metric's short-term trend is no
/// longer called stable.
const TREND_CHANGE_THRESHOLD: f64 = 10.0;

/// Confidence assigned to automatically collected values.
const COLLECTED_CONFIDENCE: u8 = 85;

/// How many prior collections to search for a comparison value.
const COMPARISON_WINDOW: usize = 10;

/// Most incidents kept per pass.
const INCIDENT_CAP: usize = 5;

/// Runs measurement passes over a decision's applicable metrics.
///
/// Passes for the same decision are serialized through a per-decision lock;
/// passes for different decisions run concurrently. Every source failure is
/// isolated to its one metric.
pub struct EvidenceCollector {
    repository: Arc<DecisionRepository>,
    evidence_store: Arc<dyn EvidenceStore>,
    metric_source: Arc<dyn MetricSource>,
    signal_feed: Arc<dyn SignalFeed>,
    source_timeout: Duration,
    locks: Mutex<HashMap<DecisionId, Arc<Mutex<()>>>>,
}

impl EvidenceCollector {
    pub fn new(
        repository: Arc<DecisionRepository>,
        evidence_store: Arc<dyn EvidenceStore>,
        metric_source: Arc<dyn MetricSource>,
        signal_feed: Arc<dyn SignalFeed>,
        source_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            evidence_store,
            metric_source,
            signal_feed,
            source_timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, decision_id: &DecisionId) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(decision_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Runs one pass for a decision and persists the resulting collection.
    pub async fn collect(
        &self,
        decision_id: &DecisionId,
        configs: &[MetricConfiguration],
    ) -> Result<EvidenceCollection, EngineError> {
        // Fails fast on unknown ids before any source is called.
        self.repository.get(decision_id).await?;

        let lock = self.lock_for(decision_id).await;
        let _guard = lock.lock().await;

        let history = self
            .evidence_store
            .recent_for_decision(decision_id, COMPARISON_WINDOW)
            .await?;

        let applicable: Vec<&MetricConfiguration> = configs
            .iter()
            .filter(|c| c.automated && c.applies_to(decision_id))
            .collect();

        let mut metrics = Vec::new();
        for config in &applicable {
            match self.sample(config).await {
                Ok(value) => {
                    let compared_to_previous = Self::compare_to_previous(&history, &config.id, value);
                    metrics.push(CollectedMetric {
                        config_id: config.id.clone(),
                        value,
                        unit: config.unit.clone(),
                        timestamp: Utc::now(),
                        source: format!("{:?}", config.source).to_lowercase(),
                        confidence: COLLECTED_CONFIDENCE,
                        trend: Self::short_term_trend(compared_to_previous, config.direction),
                        compared_to_previous,
                    });
                }
                Err(err) => {
                    warn!(metric = %config.id, error = %err, "metric unavailable, continuing pass");
                }
            }
        }

        let incidents = self.gather_incidents(decision_id).await;
        let feedback = self
            .signal_feed
            .feedback(decision_id)
            .await
            .unwrap_or_else(|err| {
                warn!(decision = %decision_id, error = %err, "feedback feed failed");
                Vec::new()
            });
        let performance = self
            .signal_feed
            .performance(decision_id)
            .await
            .unwrap_or_else(|err| {
                warn!(decision = %decision_id, error = %err, "performance feed failed");
                Vec::new()
            });
        let costs = self
            .signal_feed
            .costs(decision_id)
            .await
            .unwrap_or_else(|err| {
                warn!(decision = %decision_id, error = %err, "cost feed failed");
                Vec::new()
            });

        let config_map: HashMap<MetricConfigId, MetricConfiguration> = applicable
            .iter()
            .map(|c| (c.id.clone(), (*c).clone()))
            .collect();
        let summary = HealthScorer::summarize(&metrics, &config_map, &incidents, &feedback);

        let collection = EvidenceCollection {
            id: CollectionId::new(),
            decision_id: decision_id.clone(),
            collection_date: Utc::now(),
            metrics,
            incidents,
            feedback,
            performance,
            costs,
            summary,
        };

        self.evidence_store.append(&collection).await?;

        // Mirror collected values onto the record's evidence list after the
        // durable write succeeds.
        for metric in &collection.metrics {
            let name = config_map
                .get(&metric.config_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| metric.config_id.to_string());
            let item = EvidenceItem::metric(
                name,
                metric.value,
                metric.source.as_str(),
                metric.confidence,
            )
            .with_unit(metric.unit.as_str())
            .with_trend(metric.trend);
            self.repository.append_evidence(decision_id, item).await?;
        }

        info!(
            decision = %decision_id,
            metrics = collection.metrics.len(),
            health = %collection.summary.overall_health,
            "collection pass complete"
        );
        Ok(collection)
    }

    /// Fetches and parses one metric value, bounded by the source timeout.
    async fn sample(&self, config: &MetricConfiguration) -> Result<f64, EngineError> {
        let fetch = self.metric_source.fetch(config.source, &config.query);
        let raw = match tokio::time::timeout(self.source_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(MetricSourceError::TimedOut(self.source_timeout.as_secs())),
        }
        .map_err(|err| EngineError::MetricUnavailable {
            config_id: config.id.to_string(),
            reason: err.to_string(),
        })?;

        let value = Self::parse_value(config.source, &raw).ok_or_else(|| {
            EngineError::MetricUnavailable {
                config_id: config.id.to_string(),
                reason: "source returned no parsable number".into(),
            }
        })?;
        debug!(metric = %config.id, value, "sampled");
        Ok(value)
    }

    /// Log sources return one number per line and are averaged; everything
    /// else returns a single number.
    fn parse_value(source: SourceKind, raw: &str) -> Option<f64> {
        match source {
            SourceKind::Log => {
                let numbers: Vec<f64> = raw
                    .lines()
                    .filter_map(|line| line.trim().parse::<f64>().ok())
                    .collect();
                if numbers.is_empty() {
                    None
                } else {
                    Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            _ => raw.trim().parse::<f64>().ok(),
        }
    }

    /// Percent change vs. the most recent prior value for the same config,
    /// searching newest first. 0 when there is no prior value.
    fn compare_to_previous(
        history: &[EvidenceCollection],
        config_id: &MetricConfigId,
        value: f64,
    ) -> f64 {
        for collection in history {
            if let Some(previous) = collection.metric_value(config_id) {
                if previous == 0.0 {
                    return 0.0;
                }
                return (value - previous) / previous * 100.0;
            }
        }
        0.0
    }

    /// Short-term trend from the comparison percentage. Movement within
    /// ±10% is stable; beyond that the metric's direction decides whether
    /// the movement is an improvement. Note that for lower-is-better
    /// metrics this inverts the naive positive-change-means-improving
    /// reading: a rising error rate or latency is labeled degrading.
    fn short_term_trend(change: f64, direction: MetricDirection) -> TrendDirection {
        if change.abs() <= TREND_CHANGE_THRESHOLD {
            return TrendDirection::Stable;
        }
        let rising = change > 0.0;
        let improving = match direction {
            MetricDirection::HigherIsBetter => rising,
            MetricDirection::LowerIsBetter => !rising,
        };
        if improving {
            TrendDirection::Improving
        } else {
            TrendDirection::Degrading
        }
    }

    /// Incident log entries whose message mentions a critical or urgent
    /// problem, capped at the most recent five.
    async fn gather_incidents(&self, decision_id: &DecisionId) -> Vec<IncidentRecord> {
        let entries = match self.signal_feed.incident_log(decision_id).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(decision = %decision_id, error = %err, "incident feed failed");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| {
                let lowered = entry.message.to_lowercase();
                let severity = if lowered.contains("critical") {
                    IncidentSeverity::Critical
                } else if lowered.contains("urgent") {
                    IncidentSeverity::High
                } else {
                    return None;
                };
                Some(IncidentRecord {
                    severity,
                    message: entry.message,
                    date: entry.date,
                })
            })
            .take(INCIDENT_CAP)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::MarkdownDecisionParser;
    use crate::adapters::sources::{ScriptedMetricSource, StaticSignalFeed};
    use crate::adapters::storage::InMemoryEvidenceStore;
    use crate::domain::evidence::HealthLevel;
    use crate::domain::metrics::default_configurations;
    use crate::ports::{DocumentReader, RawDocument, RawLogEntry};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticReader {
        documents: Vec<RawDocument>,
    }

    #[async_trait]
    impl DocumentReader for StaticReader {
        async fn read_all(&self) -> Result<Vec<RawDocument>, EngineError> {
            Ok(self.documents.clone())
        }
    }

    async fn repository_with_one_decision() -> Arc<DecisionRepository> {
        let repo = Arc::new(DecisionRepository::new(
            Arc::new(StaticReader {
                documents: vec![RawDocument {
                    file_name: "ADR-0001-api.md".into(),
                    content: "# API decision\n".into(),
                    last_modified: Utc::now(),
                }],
            }),
            Arc::new(MarkdownDecisionParser::new()),
        ));
        repo.load_corpus().await.unwrap();
        repo
    }

    fn scripted_source() -> ScriptedMetricSource {
        ScriptedMetricSource::new()
            .with_response("rev-list --count --since=7.days HEAD", "12")
            .with_response("build-results.log", "90\n95\n85\n")
            .with_response("latency-p95.log", "300\n340\n")
            .with_response("error-rate.log", "0.5\n0.7\n")
    }

    fn collector(
        repo: Arc<DecisionRepository>,
        store: Arc<InMemoryEvidenceStore>,
        source: ScriptedMetricSource,
        feed: StaticSignalFeed,
    ) -> EvidenceCollector {
        EvidenceCollector::new(
            repo,
            store,
            Arc::new(source),
            Arc::new(feed),
            Duration::from_secs(10),
        )
    }

    /// Answers like the scripted source except for one query, which hangs
    /// well past any sane timeout.
    struct SlowQuerySource {
        inner: ScriptedMetricSource,
        slow_query: &'static str,
    }

    #[async_trait]
    impl MetricSource for SlowQuerySource {
        async fn fetch(
            &self,
            source: SourceKind,
            query: &str,
        ) -> Result<String, MetricSourceError> {
            if query == self.slow_query {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            self.inner.fetch(source, query).await
        }
    }

    /// Returns 1.0, 2.0, ... across successive error-rate fetches.
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetricSource for CountingSource {
        async fn fetch(
            &self,
            _source: SourceKind,
            query: &str,
        ) -> Result<String, MetricSourceError> {
            if query != "error-rate.log" {
                return Err(MetricSourceError::Failed("unscripted query".into()));
            }
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            // Yield so an unserialized racing pass would get to interleave.
            tokio::task::yield_now().await;
            Ok(format!("{}.0\n", call))
        }
    }

    #[tokio::test]
    async fn collects_only_automated_applicable_metrics() {
        let repo = repository_with_one_decision().await;
        let store = Arc::new(InMemoryEvidenceStore::new());
        let collector = collector(
            repo.clone(),
            store.clone(),
            scripted_source(),
            StaticSignalFeed::new(),
        );

        let id: DecisionId = "ADR-0001".parse().unwrap();
        let collection = collector
            .collect(&id, &default_configurations())
            .await
            .unwrap();

        // 4 automated defaults; the survey and manual ones are skipped.
        assert_eq!(collection.metrics.len(), 4);
        assert_eq!(
            collection.metric_value(&MetricConfigId::new("build-success-rate")),
            Some(90.0)
        );
        // Collected values mirror onto the record.
        assert_eq!(repo.get(&id).await.unwrap().evidence.len(), 4);
        // The pass is persisted.
        assert_eq!(store.list_for_decision(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn source_failure_is_isolated_to_one_metric() {
        let repo = repository_with_one_decision().await;
        let source = ScriptedMetricSource::new()
            .with_response("rev-list --count --since=7.days HEAD", "12")
            .with_response("build-results.log", "90\n")
            .with_response("error-rate.log", "0.5\n");
        // latency-p95.log is unregistered and fails.
        let collector = collector(
            repo,
            Arc::new(InMemoryEvidenceStore::new()),
            source,
            StaticSignalFeed::new(),
        );

        let id: DecisionId = "ADR-0001".parse().unwrap();
        let collection = collector
            .collect(&id, &default_configurations())
            .await
            .unwrap();
        assert_eq!(collection.metrics.len(), 3);
    }

    #[tokio::test]
    async fn unknown_decision_fails_before_any_source_call() {
        let repo = repository_with_one_decision().await;
        let collector = collector(
            repo,
            Arc::new(InMemoryEvidenceStore::new()),
            ScriptedMetricSource::new(),
            StaticSignalFeed::new(),
        );

        let id: DecisionId = "ADR-9999".parse().unwrap();
        let result = collector.collect(&id, &default_configurations()).await;
        assert!(matches!(result, Err(EngineError::DecisionNotFound { .. })));
    }

    #[tokio::test]
    async fn second_pass_compares_against_the_first() {
        let repo = repository_with_one_decision().await;
        let store = Arc::new(InMemoryEvidenceStore::new());
        let id: DecisionId = "ADR-0001".parse().unwrap();
        let configs = default_configurations();

        let first = collector(
            repo.clone(),
            store.clone(),
            ScriptedMetricSource::new().with_response("error-rate.log", "1.0\n"),
            StaticSignalFeed::new(),
        );
        first.collect(&id, &configs).await.unwrap();

        let second = collector(
            repo,
            store,
            ScriptedMetricSource::new().with_response("error-rate.log", "2.0\n"),
            StaticSignalFeed::new(),
        );
        let collection = second.collect(&id, &configs).await.unwrap();

        let metric = collection
            .metrics
            .iter()
            .find(|m| m.config_id == MetricConfigId::new("error-rate"))
            .unwrap();
        assert!((metric.compared_to_previous - 100.0).abs() < 1e-9);
        // Error rate is lower-is-better, so doubling is a degradation.
        assert_eq!(metric.trend, TrendDirection::Degrading);
    }

    #[tokio::test]
    async fn slow_source_times_out_and_the_pass_continues() {
        let repo = repository_with_one_decision().await;
        let collector = EvidenceCollector::new(
            repo,
            Arc::new(InMemoryEvidenceStore::new()),
            Arc::new(SlowQuerySource {
                inner: scripted_source(),
                slow_query: "latency-p95.log",
            }),
            Arc::new(StaticSignalFeed::new()),
            Duration::from_millis(50),
        );

        let id: DecisionId = "ADR-0001".parse().unwrap();
        let collection = collector
            .collect(&id, &default_configurations())
            .await
            .unwrap();

        // The stalled metric is dropped; the other three still land.
        assert_eq!(collection.metrics.len(), 3);
        assert!(collection
            .metrics
            .iter()
            .all(|m| m.config_id != MetricConfigId::new("response-time-p95")));
    }

    #[tokio::test]
    async fn concurrent_passes_for_one_decision_are_serialized() {
        let repo = repository_with_one_decision().await;
        let store = Arc::new(InMemoryEvidenceStore::new());
        let collector = Arc::new(EvidenceCollector::new(
            repo,
            store.clone(),
            Arc::new(CountingSource {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(StaticSignalFeed::new()),
            Duration::from_secs(10),
        ));
        let id: DecisionId = "ADR-0001".parse().unwrap();
        let rate = MetricConfigId::new("error-rate");
        let configs: Vec<MetricConfiguration> = default_configurations()
            .into_iter()
            .filter(|c| c.id == rate)
            .collect();

        let first = tokio::spawn({
            let collector = collector.clone();
            let id = id.clone();
            let configs = configs.clone();
            async move { collector.collect(&id, &configs).await }
        });
        let second = tokio::spawn({
            let collector = collector.clone();
            let id = id.clone();
            let configs = configs.clone();
            async move { collector.collect(&id, &configs).await }
        });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let passes = store.list_for_decision(&id).await.unwrap();
        assert_eq!(passes.len(), 2);

        // Serialized passes: whichever ran second saw the other's value in
        // its history and compared against it.
        let earlier = passes
            .iter()
            .find(|p| p.metric_value(&rate) == Some(1.0))
            .unwrap();
        let later = passes
            .iter()
            .find(|p| p.metric_value(&rate) == Some(2.0))
            .unwrap();
        assert_eq!(earlier.metrics[0].compared_to_previous, 0.0);
        assert!((later.metrics[0].compared_to_previous - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn critical_incidents_force_critical_health() {
        let repo = repository_with_one_decision().await;
        let feed = StaticSignalFeed::new().with_log_entries(vec![
            RawLogEntry {
                message: "CRITICAL: payment outage".into(),
                date: Utc::now(),
            },
            RawLogEntry {
                message: "routine deploy".into(),
                date: Utc::now(),
            },
            RawLogEntry {
                message: "urgent: queue backlog".into(),
                date: Utc::now(),
            },
        ]);
        let collector = collector(
            repo,
            Arc::new(InMemoryEvidenceStore::new()),
            scripted_source(),
            feed,
        );

        let id: DecisionId = "ADR-0001".parse().unwrap();
        let collection = collector
            .collect(&id, &default_configurations())
            .await
            .unwrap();

        assert_eq!(collection.incidents.len(), 2);
        assert_eq!(collection.incidents[0].severity, IncidentSeverity::Critical);
        assert_eq!(collection.incidents[1].severity, IncidentSeverity::High);
        assert_eq!(collection.summary.overall_health, HealthLevel::Critical);
    }

    #[tokio::test]
    async fn incidents_are_capped_at_five() {
        let repo = repository_with_one_decision().await;
        let entries = (0..8)
            .map(|i| RawLogEntry {
                message: format!("critical issue {}", i),
                date: Utc::now(),
            })
            .collect();
        let collector = collector(
            repo,
            Arc::new(InMemoryEvidenceStore::new()),
            scripted_source(),
            StaticSignalFeed::new().with_log_entries(entries),
        );

        let id: DecisionId = "ADR-0001".parse().unwrap();
        let collection = collector
            .collect(&id, &default_configurations())
            .await
            .unwrap();
        assert_eq!(collection.incidents.len(), 5);
    }

    #[test]
    fn log_output_is_averaged_and_git_output_is_scalar() {
        assert_eq!(
            EvidenceCollector::parse_value(SourceKind::Log, "10\nnoise\n20\n"),
            Some(15.0)
        );
        assert_eq!(
            EvidenceCollector::parse_value(SourceKind::Git, " 42 \n"),
            Some(42.0)
        );
        assert_eq!(EvidenceCollector::parse_value(SourceKind::Log, "noise"), None);
    }

    #[test]
    fn small_movement_is_stable() {
        assert_eq!(
            EvidenceCollector::short_term_trend(5.0, MetricDirection::HigherIsBetter),
            TrendDirection::Stable
        );
        assert_eq!(
            EvidenceCollector::short_term_trend(15.0, MetricDirection::HigherIsBetter),
            TrendDirection::Improving
        );
        assert_eq!(
            EvidenceCollector::short_term_trend(-15.0, MetricDirection::LowerIsBetter),
            TrendDirection::Improving
        );
    }
}
