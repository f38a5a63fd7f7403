//! Evidence collections: one point-in-time measurement pass per decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::decision::TrendDirection;
use crate::domain::foundation::{CollectionId, DecisionId, MetricConfigId};

/// Four-bucket overall health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthLevel::Excellent => "excellent",
            HealthLevel::Good => "good",
            HealthLevel::Warning => "warning",
            HealthLevel::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// One sampled metric value inside a collection. Ephemeral: belongs to
/// exactly one `EvidenceCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedMetric {
    pub config_id: MetricConfigId,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub confidence: u8,
    pub trend: TrendDirection,
    /// Percent change vs. the most recent prior stored value for the same
    /// config id; 0 when no prior value exists.
    pub compared_to_previous: f64,
}

/// Severity attached to an incident message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Critical,
    High,
    Medium,
    Low,
}

/// An incident observed near this decision's footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub severity: IncidentSeverity,
    pub message: String,
    pub date: DateTime<Utc>,
}

/// Sentiment of a feedback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// A qualitative feedback entry returned by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub sentiment: Sentiment,
    pub comment: String,
    pub source: String,
    pub date: DateTime<Utc>,
}

/// A performance observation returned by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub metric: String,
    pub value: f64,
    pub unit: String,
    pub date: DateTime<Utc>,
}

/// A cost observation returned by an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    pub category: String,
    pub amount: f64,
    pub currency: String,
    pub date: DateTime<Utc>,
}

/// Aggregated judgement over one collection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub overall_health: HealthLevel,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub trends_detected: Vec<String>,
}

/// One point-in-time measurement pass for one decision.
///
/// Persisted as an immutable append-only record keyed by
/// (decision id, collection date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceCollection {
    pub id: CollectionId,
    pub decision_id: DecisionId,
    pub collection_date: DateTime<Utc>,
    pub metrics: Vec<CollectedMetric>,
    pub incidents: Vec<IncidentRecord>,
    pub feedback: Vec<FeedbackRecord>,
    pub performance: Vec<PerformanceRecord>,
    pub costs: Vec<CostRecord>,
    pub summary: CollectionSummary,
}

impl EvidenceCollection {
    /// Returns the collected value for a config id, if present.
    pub fn metric_value(&self, config_id: &MetricConfigId) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| &m.config_id == config_id)
            .map(|m| m.value)
    }
}
