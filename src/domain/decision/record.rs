//! The decision record aggregate and its classification enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::DecisionId;

use super::EvidenceItem;

/// Lifecycle status of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Proposed,
    Accepted,
    Rejected,
    Deprecated,
    Superseded,
}

impl DecisionStatus {
    /// All statuses, in display order.
    pub const ALL: [DecisionStatus; 5] = [
        DecisionStatus::Proposed,
        DecisionStatus::Accepted,
        DecisionStatus::Rejected,
        DecisionStatus::Deprecated,
        DecisionStatus::Superseded,
    ];
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionStatus::Proposed => "proposed",
            DecisionStatus::Accepted => "accepted",
            DecisionStatus::Rejected => "rejected",
            DecisionStatus::Deprecated => "deprecated",
            DecisionStatus::Superseded => "superseded",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DecisionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proposed" => Ok(DecisionStatus::Proposed),
            "accepted" => Ok(DecisionStatus::Accepted),
            "rejected" => Ok(DecisionStatus::Rejected),
            "deprecated" => Ok(DecisionStatus::Deprecated),
            "superseded" => Ok(DecisionStatus::Superseded),
            _ => Err(()),
        }
    }
}

/// How far implementation of the decision has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    Planned,
    InProgress,
    Completed,
    Failed,
}

impl ImplementationStatus {
    /// All statuses, in display order.
    pub const ALL: [ImplementationStatus; 4] = [
        ImplementationStatus::Planned,
        ImplementationStatus::InProgress,
        ImplementationStatus::Completed,
        ImplementationStatus::Failed,
    ];
}

impl fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImplementationStatus::Planned => "planned",
            ImplementationStatus::InProgress => "in_progress",
            ImplementationStatus::Completed => "completed",
            ImplementationStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ImplementationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(ImplementationStatus::Planned),
            "in_progress" | "in progress" => Ok(ImplementationStatus::InProgress),
            "completed" => Ok(ImplementationStatus::Completed),
            "failed" => Ok(ImplementationStatus::Failed),
            _ => Err(()),
        }
    }
}

/// Derived document complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Derived blast-radius classification.
///
/// The keyword heuristic never produces `Low`; the variant exists for
/// manual curation and forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

impl Impact {
    /// All impacts, in display order.
    pub const ALL: [Impact; 4] = [Impact::Low, Impact::Medium, Impact::High, Impact::Critical];
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
            Impact::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Structured consequences of a decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequences {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub risks: Vec<String>,
}

/// Derived file metadata for a decision document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub file_path: String,
    pub last_modified: DateTime<Utc>,
    /// Document size in bytes.
    pub size: usize,
    pub complexity: Complexity,
    pub impact: Impact,
}

/// A parsed architecture decision record.
///
/// Records are produced by a full reparse of the corpus (replace-all) and
/// are effectively immutable during a process run, except that collection
/// passes append to `evidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub id: DecisionId,
    pub number: u32,
    pub title: String,
    pub status: DecisionStatus,
    pub date: DateTime<Utc>,
    pub author: String,
    pub component: String,
    pub problem: String,
    pub decision: String,
    pub rationale: String,
    pub consequences: Consequences,
    pub alternatives: Vec<String>,
    pub evidence: Vec<EvidenceItem>,
    /// Other decisions referenced anywhere in the document text.
    /// Never contains this record's own id.
    pub linked_decisions: Vec<DecisionId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supersedes: Vec<DecisionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<DecisionId>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_date: Option<DateTime<Utc>>,
    pub implementation_status: ImplementationStatus,
    pub metadata: RecordMetadata,
}
