//! Corpus-wide analytics and search.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::decision::{DecisionRecord, DecisionStatus, Impact};
use crate::domain::foundation::DecisionId;

use super::repository::DecisionRepository;

/// Window for the recent-decisions list.
const RECENT_WINDOW_DAYS: i64 = 30;

/// Caps for the recent and most-linked lists.
const RECENT_CAP: usize = 10;
const MOST_LINKED_CAP: usize = 10;

/// A decision reduced to its listing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSummary {
    pub id: DecisionId,
    pub title: String,
    pub status: DecisionStatus,
    pub date: DateTime<Utc>,
}

impl From<&DecisionRecord> for DecisionSummary {
    fn from(record: &DecisionRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            status: record.status,
            date: record.date,
        }
    }
}

/// One entry in the most-linked ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDecisionSummary {
    pub id: DecisionId,
    pub title: String,
    pub inbound_links: usize,
}

/// Corpus-wide aggregate view. Maps are ordered so serialized output is
/// stable between runs over the same corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnalytics {
    pub total_decisions: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_component: BTreeMap<String, usize>,
    pub by_impact: BTreeMap<String, usize>,
    pub implementation_progress: BTreeMap<String, usize>,
    pub recent_decisions: Vec<DecisionSummary>,
    pub most_linked: Vec<LinkedDecisionSummary>,
}

/// Search filters. All filters are conjunctive; an empty filter set
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Case-insensitive substring over title, problem, decision text, and
    /// tags.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub status: Option<DecisionStatus>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Read-side aggregations over the loaded corpus.
pub struct AnalyticsService {
    repository: Arc<DecisionRepository>,
}

impl AnalyticsService {
    pub fn new(repository: Arc<DecisionRepository>) -> Self {
        Self { repository }
    }

    /// Builds the corpus-wide aggregate view.
    pub async fn overview(&self) -> DecisionAnalytics {
        let records = self.repository.all().await;

        let mut by_status = BTreeMap::new();
        let mut by_component = BTreeMap::new();
        let mut by_impact = BTreeMap::new();
        let mut implementation_progress = BTreeMap::new();
        for record in &records {
            *by_status.entry(record.status.to_string()).or_insert(0) += 1;
            *by_component.entry(record.component.clone()).or_insert(0) += 1;
            *by_impact
                .entry(record.metadata.impact.to_string())
                .or_insert(0) += 1;
            *implementation_progress
                .entry(record.implementation_status.to_string())
                .or_insert(0) += 1;
        }

        let cutoff = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let mut recent: Vec<&DecisionRecord> =
            records.iter().filter(|r| r.date >= cutoff).collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        let recent_decisions = recent
            .into_iter()
            .take(RECENT_CAP)
            .map(DecisionSummary::from)
            .collect();

        let most_linked = self
            .repository
            .most_linked(MOST_LINKED_CAP)
            .await
            .into_iter()
            .filter_map(|(id, count)| {
                records.iter().find(|r| r.id == id).map(|r| LinkedDecisionSummary {
                    id,
                    title: r.title.clone(),
                    inbound_links: count,
                })
            })
            .collect();

        DecisionAnalytics {
            total_decisions: records.len(),
            by_status,
            by_component,
            by_impact,
            implementation_progress,
            recent_decisions,
            most_linked,
        }
    }

    /// Filters the corpus, preserving corpus order.
    pub async fn search(&self, filters: &SearchFilters) -> Vec<DecisionRecord> {
        let text = filters.text.as_ref().map(|t| t.to_lowercase());
        self.repository
            .all()
            .await
            .into_iter()
            .filter(|record| {
                if let Some(needle) = &text {
                    let haystack = format!(
                        "{} {} {} {}",
                        record.title,
                        record.problem,
                        record.decision,
                        record.tags.join(" ")
                    )
                    .to_lowercase();
                    if !haystack.contains(needle) {
                        return false;
                    }
                }
                if let Some(status) = filters.status {
                    if record.status != status {
                        return false;
                    }
                }
                if let Some(impact) = filters.impact {
                    if record.metadata.impact != impact {
                        return false;
                    }
                }
                if let Some(component) = &filters.component {
                    if !record.component.eq_ignore_ascii_case(component) {
                        return false;
                    }
                }
                if let Some(tag) = &filters.tag {
                    if !record.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                        return false;
                    }
                }
                true
            })
            .collect()
    }
}
