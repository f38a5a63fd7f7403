//! Report generation over the corpus and its evidence history.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::analysis::TrendAnalysis;
use crate::domain::evidence::HealthLevel;
use crate::domain::foundation::{DecisionId, EngineError};
use crate::domain::metrics::MetricConfiguration;
use crate::ports::EvidenceStore;

use super::analytics::{AnalyticsService, DecisionAnalytics, DecisionSummary};
use super::analyzer::TrendAnalyzer;
use super::repository::DecisionRepository;

/// Most decisions detailed in one report.
const REPORT_DECISION_CAP: usize = 10;

/// Most trends shown per decision.
const REPORT_TREND_CAP: usize = 3;

/// Period label attached to report trends.
const REPORT_PERIOD: &str = "30d";

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Per-decision section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReportEntry {
    #[serde(flatten)]
    pub summary: DecisionSummary,
    pub component: String,
    /// Health from the latest stored collection, if any pass has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthLevel>,
    pub key_findings: Vec<String>,
    pub trends: Vec<TrendAnalysis>,
}

/// A full report snapshot. Rendering is deterministic for a given
/// snapshot: sections follow corpus order and maps are pre-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReport {
    pub generated_at: DateTime<Utc>,
    pub analytics: DecisionAnalytics,
    pub decisions: Vec<DecisionReportEntry>,
}

/// Assembles report snapshots and renders them.
pub struct ReportGenerator {
    repository: Arc<DecisionRepository>,
    analytics: Arc<AnalyticsService>,
    analyzer: Arc<TrendAnalyzer>,
    evidence_store: Arc<dyn EvidenceStore>,
}

impl ReportGenerator {
    pub fn new(
        repository: Arc<DecisionRepository>,
        analytics: Arc<AnalyticsService>,
        analyzer: Arc<TrendAnalyzer>,
        evidence_store: Arc<dyn EvidenceStore>,
    ) -> Self {
        Self {
            repository,
            analytics,
            analyzer,
            evidence_store,
        }
    }

    /// Builds the report snapshot: the corpus overview plus detail
    /// sections. Scoped to one decision when `scope` is given, otherwise
    /// the first ten decisions in corpus order.
    pub async fn generate(
        &self,
        configs: &[MetricConfiguration],
        scope: Option<&DecisionId>,
    ) -> Result<DecisionReport, EngineError> {
        let analytics = self.analytics.overview().await;

        let scoped = match scope {
            Some(id) => vec![self.repository.get(id).await?],
            None => self
                .repository
                .all()
                .await
                .into_iter()
                .take(REPORT_DECISION_CAP)
                .collect(),
        };

        let mut decisions = Vec::new();
        for record in scoped {
            let latest = self
                .evidence_store
                .recent_for_decision(&record.id, 1)
                .await?
                .into_iter()
                .next();
            let mut trends = self
                .analyzer
                .analyze(&record.id, configs, REPORT_PERIOD)
                .await?;
            trends.truncate(REPORT_TREND_CAP);

            decisions.push(DecisionReportEntry {
                summary: DecisionSummary::from(&record),
                component: record.component.clone(),
                health: latest.as_ref().map(|c| c.summary.overall_health),
                key_findings: latest
                    .map(|c| c.summary.key_findings)
                    .unwrap_or_default(),
                trends,
            });
        }

        Ok(DecisionReport {
            generated_at: Utc::now(),
            analytics,
            decisions,
        })
    }

    /// Renders a snapshot in the requested format.
    pub fn render(report: &DecisionReport, format: ReportFormat) -> Result<String, EngineError> {
        match format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(report).map_err(EngineError::storage)
            }
            ReportFormat::Markdown => Ok(Self::render_markdown(report)),
        }
    }

    fn render_markdown(report: &DecisionReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Decision Health Report");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "## Overview");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "- Total decisions: {}",
            report.analytics.total_decisions
        );
        for (status, count) in &report.analytics.by_status {
            let _ = writeln!(out, "- {}: {}", status, count);
        }
        if !report.analytics.most_linked.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "### Most referenced");
            let _ = writeln!(out);
            for entry in &report.analytics.most_linked {
                let _ = writeln!(
                    out,
                    "- {} {} ({} inbound)",
                    entry.id, entry.title, entry.inbound_links
                );
            }
        }

        for entry in &report.decisions {
            let _ = writeln!(out);
            let _ = writeln!(out, "## {} {}", entry.summary.id, entry.summary.title);
            let _ = writeln!(out);
            let _ = writeln!(out, "- Status: {}", entry.summary.status);
            let _ = writeln!(out, "- Component: {}", entry.component);
            if let Some(health) = entry.health {
                let _ = writeln!(out, "- Health: {}", health);
            }
            if !entry.key_findings.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "### Findings");
                let _ = writeln!(out);
                for finding in &entry.key_findings {
                    let _ = writeln!(out, "- {}", finding);
                }
            }
            if !entry.trends.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "### Trends");
                let _ = writeln!(out);
                for trend in &entry.trends {
                    let _ = writeln!(
                        out,
                        "- {}: {} ({:+.1}% over {}, {} points)",
                        trend.metric,
                        trend.trend,
                        trend.change_percentage,
                        trend.period,
                        trend.data_points
                    );
                }
            }
        }

        out
    }
}
