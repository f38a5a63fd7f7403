//! Health scoring over one collection pass.
//!
//! Each collected metric maps to a 0–100 score via its configuration's
//! threshold chain; scores are averaged and bucketed into a four-level
//! overall health. Findings and recommendations come from fixed rule
//! templates over the same inputs.

use std::collections::HashMap;

use crate::domain::evidence::{
    CollectedMetric, CollectionSummary, FeedbackRecord, HealthLevel, IncidentRecord,
    IncidentSeverity, Sentiment,
};
use crate::domain::foundation::MetricConfigId;
use crate::domain::metrics::{MetricConfiguration, MetricDirection, Thresholds};

/// A metric scoring below this mark produces a finding.
const FINDING_SCORE_FLOOR: u8 = 50;

/// Share of negative feedback that produces a finding.
const NEGATIVE_FEEDBACK_SHARE: f64 = 0.30;

/// Percent change that produces trend commentary.
const TREND_COMMENT_THRESHOLD: f64 = 20.0;

/// Calculator for per-metric scores and the collection summary.
pub struct HealthScorer;

impl HealthScorer {
    /// Maps a raw value to a 0/25/50/75/100 score against the thresholds.
    ///
    /// The chain walks thresholds in "goodness" order; `direction` decides
    /// whether the comparisons read `<=`/`>=` (higher is better) or the
    /// mirror (lower is better). Boundaries belong to the bucket they name:
    /// with higher-is-better thresholds `{excellent: 90, good: 80,
    /// warning: 70, critical: 50}` a value of exactly 70 scores 25, exactly
    /// 50 scores 0, and exactly 90 scores 100. The 75 band is the open
    /// interval between good and excellent.
    pub fn metric_score(value: f64, thresholds: &Thresholds, direction: MetricDirection) -> u8 {
        match direction {
            MetricDirection::HigherIsBetter => {
                if value <= thresholds.critical {
                    0
                } else if value <= thresholds.warning {
                    25
                } else if value <= thresholds.good {
                    50
                } else if value >= thresholds.excellent {
                    100
                } else {
                    75
                }
            }
            MetricDirection::LowerIsBetter => {
                if value >= thresholds.critical {
                    0
                } else if value >= thresholds.warning {
                    25
                } else if value >= thresholds.good {
                    50
                } else if value <= thresholds.excellent {
                    100
                } else {
                    75
                }
            }
        }
    }

    /// Buckets an average score into the four health levels.
    pub fn bucket(avg_score: f64) -> HealthLevel {
        if avg_score >= 75.0 {
            HealthLevel::Excellent
        } else if avg_score >= 50.0 {
            HealthLevel::Good
        } else if avg_score >= 25.0 {
            HealthLevel::Warning
        } else {
            HealthLevel::Critical
        }
    }

    /// Builds the summary for one collection pass.
    ///
    /// # Edge cases
    /// - No scoreable metrics: overall health defaults to `Good`.
    /// - Any critical incident forces `Critical` regardless of scores.
    /// - No findings at all: two generic recommendations are emitted
    ///   instead of an empty list.
    pub fn summarize(
        metrics: &[CollectedMetric],
        configs: &HashMap<MetricConfigId, MetricConfiguration>,
        incidents: &[IncidentRecord],
        feedback: &[FeedbackRecord],
    ) -> CollectionSummary {
        let mut key_findings = Vec::new();
        let mut recommendations = Vec::new();
        let mut trends_detected = Vec::new();

        // Per-metric scores, only for metrics with a matching configuration.
        let mut scores: Vec<(String, u8)> = Vec::new();
        for metric in metrics {
            if let Some(config) = configs.get(&metric.config_id) {
                let score =
                    Self::metric_score(metric.value, &config.thresholds, config.direction);
                scores.push((config.name.clone(), score));
            }
        }

        let overall_health = if scores.is_empty() {
            HealthLevel::Good
        } else {
            let avg =
                scores.iter().map(|(_, s)| f64::from(*s)).sum::<f64>() / scores.len() as f64;
            Self::bucket(avg)
        };

        for (name, score) in &scores {
            if *score < FINDING_SCORE_FLOOR {
                key_findings.push(format!("{} is below acceptable thresholds", name));
                recommendations.push(format!(
                    "Investigate {} and plan corrective action",
                    name
                ));
            }
        }

        let critical_incidents = incidents
            .iter()
            .filter(|i| i.severity == IncidentSeverity::Critical)
            .count();
        if critical_incidents > 0 {
            key_findings.push(format!(
                "{} critical incident(s) recorded since the last pass",
                critical_incidents
            ));
            recommendations
                .push("Review critical incidents and confirm the decision still holds".into());
        }

        if !feedback.is_empty() {
            let negative = feedback
                .iter()
                .filter(|f| f.sentiment == Sentiment::Negative)
                .count();
            if (negative as f64) / (feedback.len() as f64) > NEGATIVE_FEEDBACK_SHARE {
                key_findings.push(format!(
                    "Negative feedback share is high ({} of {})",
                    negative,
                    feedback.len()
                ));
                recommendations
                    .push("Gather detailed feedback and reassess the decision's consequences".into());
            }
        }

        if key_findings.is_empty() {
            recommendations.push("Continue monitoring key metrics".into());
            recommendations.push("Schedule a routine review of this decision".into());
        }

        for metric in metrics {
            if metric.compared_to_previous.abs() > TREND_COMMENT_THRESHOLD {
                let verb = if metric.compared_to_previous > 0.0 {
                    "increased"
                } else {
                    "decreased"
                };
                // Same reader-facing name as findings and recommendations.
                let name = configs
                    .get(&metric.config_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or_else(|| metric.config_id.as_str());
                trends_detected.push(format!(
                    "{} {} by {:.1}%",
                    name,
                    verb,
                    metric.compared_to_previous.abs()
                ));
            }
        }

        let overall_health = if critical_incidents > 0 {
            HealthLevel::Critical
        } else {
            overall_health
        };

        CollectionSummary {
            overall_health,
            key_findings,
            recommendations,
            trends_detected,
        }
    }
}
