//! Evidence items attached to a decision record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of evidence attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Metric,
    Feedback,
    Incident,
    Performance,
    Cost,
    Survey,
}

/// Direction a measured signal is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Degrading,
    Unknown,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Stable => "stable",
            TrendDirection::Degrading => "degrading",
            TrendDirection::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Evidence payload: either a measured number or free text.
///
/// A tagged union instead of a dynamic value so health scoring can
/// statically require a numeric payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvidenceValue {
    Number(f64),
    Text(String),
}

impl EvidenceValue {
    /// Returns the numeric payload, if this is numeric evidence.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            EvidenceValue::Number(n) => Some(*n),
            EvidenceValue::Text(_) => None,
        }
    }
}

impl FromStr for EvidenceValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<f64>() {
            Ok(n) => EvidenceValue::Number(n),
            Err(_) => EvidenceValue::Text(s.trim().to_string()),
        })
    }
}

/// One quantitative or qualitative data point attached to a decision.
///
/// Immutable once created; owned by exactly one `DecisionRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub id: String,
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
    pub description: String,
    pub value: EvidenceValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub date: DateTime<Utc>,
    pub source: String,
    /// Confidence in this data point, 0–100.
    pub confidence: u8,
    pub trend: TrendDirection,
}

impl EvidenceItem {
    /// Creates a metric evidence item with a fresh id.
    pub fn metric(
        description: impl Into<String>,
        value: f64,
        source: impl Into<String>,
        confidence: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            evidence_type: EvidenceType::Metric,
            description: description.into(),
            value: EvidenceValue::Number(value),
            unit: None,
            date: Utc::now(),
            source: source.into(),
            confidence: confidence.min(100),
            trend: TrendDirection::Unknown,
        }
    }

    /// Sets the measurement unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the trend classification.
    pub fn with_trend(mut self, trend: TrendDirection) -> Self {
        self.trend = trend;
        self
    }
}
