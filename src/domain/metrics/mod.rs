//! Metric configurations: what to measure, where, and how to judge it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DecisionId, MetricConfigId};

/// What kind of signal a metric captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Performance,
    Business,
    Technical,
    UserSatisfaction,
    Cost,
}

/// Where a metric's raw value comes from. The `query` string is opaque to
/// the engine and interpreted by the data-source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Git,
    Database,
    Api,
    Log,
    Survey,
    Manual,
}

/// How often automatic collection should sample this metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

/// Whether larger raw values are better or worse for this metric.
///
/// The threshold→score chain assumes thresholds ordered by "goodness";
/// success-rate style metrics read the chain with `<=`, latency/cost style
/// metrics with `>=`. Declared explicitly per configuration instead of
/// guessing from the threshold ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// Score boundaries for a metric, in the metric's own unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub excellent: f64,
    pub good: f64,
    pub warning: f64,
    pub critical: f64,
}

/// Configuration of one measurable signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfiguration {
    pub id: MetricConfigId,
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub source: SourceKind,
    pub query: String,
    pub unit: String,
    pub frequency: Frequency,
    pub thresholds: Thresholds,
    #[serde(default)]
    pub direction: MetricDirection,
    /// Decisions this metric applies to. Empty means every decision.
    #[serde(default)]
    pub related_decisions: Vec<DecisionId>,
    /// Manual configurations are visible but skipped by automatic passes.
    pub automated: bool,
}

impl MetricConfiguration {
    /// Whether this metric applies to the given decision.
    pub fn applies_to(&self, decision_id: &DecisionId) -> bool {
        self.related_decisions.is_empty() || self.related_decisions.contains(decision_id)
    }
}

/// The bootstrap metric set, persisted the first time no configuration
/// file exists. Spans git, log, and survey sources; latency-style entries
/// declare `lower_is_better` rather than inverting their thresholds.
pub fn default_configurations() -> Vec<MetricConfiguration> {
    vec![
        MetricConfiguration {
            id: MetricConfigId::new("commit-frequency"),
            name: "Commit Frequency".into(),
            metric_type: MetricType::Technical,
            source: SourceKind::Git,
            query: "rev-list --count --since=7.days HEAD".into(),
            unit: "commits/week".into(),
            frequency: Frequency::Weekly,
            thresholds: Thresholds {
                excellent: 20.0,
                good: 10.0,
                warning: 5.0,
                critical: 1.0,
            },
            direction: MetricDirection::HigherIsBetter,
            related_decisions: vec![],
            automated: true,
        },
        MetricConfiguration {
            id: MetricConfigId::new("build-success-rate"),
            name: "Build Success Rate".into(),
            metric_type: MetricType::Technical,
            source: SourceKind::Log,
            query: "build-results.log".into(),
            unit: "%".into(),
            frequency: Frequency::Daily,
            thresholds: Thresholds {
                excellent: 95.0,
                good: 85.0,
                warning: 70.0,
                critical: 50.0,
            },
            direction: MetricDirection::HigherIsBetter,
            related_decisions: vec![],
            automated: true,
        },
        MetricConfiguration {
            id: MetricConfigId::new("response-time-p95"),
            name: "Response Time (p95)".into(),
            metric_type: MetricType::Performance,
            source: SourceKind::Log,
            query: "latency-p95.log".into(),
            unit: "ms".into(),
            frequency: Frequency::Daily,
            thresholds: Thresholds {
                excellent: 200.0,
                good: 500.0,
                warning: 1000.0,
                critical: 2000.0,
            },
            direction: MetricDirection::LowerIsBetter,
            related_decisions: vec![],
            automated: true,
        },
        MetricConfiguration {
            id: MetricConfigId::new("error-rate"),
            name: "Error Rate".into(),
            metric_type: MetricType::Technical,
            source: SourceKind::Log,
            query: "error-rate.log".into(),
            unit: "%".into(),
            frequency: Frequency::Hourly,
            thresholds: Thresholds {
                excellent: 0.1,
                good: 1.0,
                warning: 5.0,
                critical: 10.0,
            },
            direction: MetricDirection::LowerIsBetter,
            related_decisions: vec![],
            automated: true,
        },
        MetricConfiguration {
            id: MetricConfigId::new("developer-satisfaction"),
            name: "Developer Satisfaction".into(),
            metric_type: MetricType::UserSatisfaction,
            source: SourceKind::Survey,
            query: "quarterly-dev-survey".into(),
            unit: "score".into(),
            frequency: Frequency::Monthly,
            thresholds: Thresholds {
                excellent: 90.0,
                good: 75.0,
                warning: 60.0,
                critical: 40.0,
            },
            direction: MetricDirection::HigherIsBetter,
            related_decisions: vec![],
            automated: false,
        },
        MetricConfiguration {
            id: MetricConfigId::new("infra-cost"),
            name: "Infrastructure Cost".into(),
            metric_type: MetricType::Cost,
            source: SourceKind::Manual,
            query: "monthly-invoice".into(),
            unit: "USD/month".into(),
            frequency: Frequency::Monthly,
            thresholds: Thresholds {
                excellent: 1000.0,
                good: 2500.0,
                warning: 5000.0,
                critical: 10000.0,
            },
            direction: MetricDirection::LowerIsBetter,
            related_decisions: vec![],
            automated: false,
        },
    ]
}
