//! Cross-reference graph derived from decision records.
//!
//! Links are derived data: recomputed whenever the corpus is replaced and
//! never persisted. Relationship types richer than `related_to` exist in
//! the model for manual curation but are not inferred automatically.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::decision::DecisionRecord;
use crate::domain::foundation::DecisionId;

/// How two decisions relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRelationship {
    DependsOn,
    ConflictsWith,
    Supports,
    Supersedes,
    RelatedTo,
}

/// Strength of a derived link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrength {
    Weak,
    Medium,
    Strong,
}

/// A directed reference between two decision records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLink {
    pub from: DecisionId,
    pub to: DecisionId,
    pub relationship: LinkRelationship,
    pub description: String,
    pub strength: LinkStrength,
}

/// The derived link graph over one corpus snapshot.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    links: Vec<DecisionLink>,
    /// Corpus order, used to break ranking ties deterministically.
    corpus_order: Vec<DecisionId>,
}

impl LinkGraph {
    /// Builds the graph from records in corpus order.
    ///
    /// For every id a record references, one `related_to`/medium link is
    /// emitted if the target exists in the corpus and is not the record
    /// itself. Dangling references are silently dropped.
    pub fn build(records: &[DecisionRecord]) -> Self {
        let known: HashSet<&DecisionId> = records.iter().map(|r| &r.id).collect();
        let mut links = Vec::new();

        for record in records {
            for target in &record.linked_decisions {
                if target == &record.id || !known.contains(target) {
                    continue;
                }
                links.push(DecisionLink {
                    from: record.id.clone(),
                    to: target.clone(),
                    relationship: LinkRelationship::RelatedTo,
                    description: format!("Referenced in {}", record.id),
                    strength: LinkStrength::Medium,
                });
            }
        }

        Self {
            links,
            corpus_order: records.iter().map(|r| r.id.clone()).collect(),
        }
    }

    /// All derived links.
    pub fn links(&self) -> &[DecisionLink] {
        &self.links
    }

    /// All links touching `id` as either endpoint. Direction is stored but
    /// informational only, so it is not a query filter.
    pub fn links_for(&self, id: &DecisionId) -> Vec<DecisionLink> {
        self.links
            .iter()
            .filter(|l| &l.from == id || &l.to == id)
            .cloned()
            .collect()
    }

    /// Number of links pointing at `id`.
    pub fn inbound_count(&self, id: &DecisionId) -> usize {
        self.links.iter().filter(|l| &l.to == id).count()
    }

    /// Top `n` decisions ranked by inbound link count, descending.
    /// Ties keep corpus order.
    pub fn most_linked(&self, n: usize) -> Vec<(DecisionId, usize)> {
        let mut inbound: HashMap<&DecisionId, usize> = HashMap::new();
        for link in &self.links {
            *inbound.entry(&link.to).or_insert(0) += 1;
        }

        let mut ranked: Vec<(DecisionId, usize)> = self
            .corpus_order
            .iter()
            .map(|id| (id.clone(), inbound.get(id).copied().unwrap_or(0)))
            .collect();
        // Stable sort keeps corpus order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{
        Complexity, Consequences, DecisionStatus, Impact, ImplementationStatus, RecordMetadata,
    };
    use chrono::Utc;

    fn record(id: &str, links: &[&str]) -> DecisionRecord {
        DecisionRecord {
            id: id.parse().unwrap(),
            number: id[4..].parse().unwrap(),
            title: format!("Decision {}", id),
            status: DecisionStatus::Accepted,
            date: Utc::now(),
            author: "Unknown".into(),
            component: "General".into(),
            problem: String::new(),
            decision: String::new(),
            rationale: String::new(),
            consequences: Consequences::default(),
            alternatives: vec![],
            evidence: vec![],
            linked_decisions: links.iter().map(|l| l.parse().unwrap()).collect(),
            supersedes: vec![],
            superseded_by: None,
            tags: vec![],
            review_date: None,
            implementation_status: ImplementationStatus::Planned,
            metadata: RecordMetadata {
                file_path: format!("{}.md", id),
                last_modified: Utc::now(),
                size: 0,
                complexity: Complexity::Low,
                impact: Impact::Medium,
            },
        }
    }

    #[test]
    fn build_emits_related_to_links_for_known_targets() {
        let records = vec![record("ADR-0001", &["ADR-0002"]), record("ADR-0002", &[])];
        let graph = LinkGraph::build(&records);

        assert_eq!(graph.links().len(), 1);
        let link = &graph.links()[0];
        assert_eq!(link.from.as_str(), "ADR-0001");
        assert_eq!(link.to.as_str(), "ADR-0002");
        assert_eq!(link.relationship, LinkRelationship::RelatedTo);
        assert_eq!(link.strength, LinkStrength::Medium);
        assert_eq!(link.description, "Referenced in ADR-0001");
    }

    #[test]
    fn build_drops_dangling_and_self_references() {
        let records = vec![record("ADR-0001", &["ADR-0001", "ADR-9999"])];
        let graph = LinkGraph::build(&records);
        assert!(graph.links().is_empty());
    }

    #[test]
    fn links_for_matches_either_endpoint() {
        let records = vec![
            record("ADR-0001", &["ADR-0002"]),
            record("ADR-0002", &["ADR-0003"]),
            record("ADR-0003", &[]),
        ];
        let graph = LinkGraph::build(&records);

        let touching = graph.links_for(&"ADR-0002".parse().unwrap());
        assert_eq!(touching.len(), 2);
    }

    #[test]
    fn most_linked_ranks_by_inbound_count() {
        // B and C both link to A; nothing links to B or C.
        let records = vec![
            record("ADR-0002", &["ADR-0001"]),
            record("ADR-0003", &["ADR-0001"]),
            record("ADR-0001", &[]),
        ];
        let graph = LinkGraph::build(&records);

        let ranked = graph.most_linked(3);
        assert_eq!(ranked[0].0.as_str(), "ADR-0001");
        assert_eq!(ranked[0].1, 2);
        // Ties keep corpus order.
        assert_eq!(ranked[1].0.as_str(), "ADR-0002");
        assert_eq!(ranked[2].0.as_str(), "ADR-0003");
    }

    #[test]
    fn most_linked_truncates_to_n() {
        let records = vec![
            record("ADR-0001", &[]),
            record("ADR-0002", &[]),
            record("ADR-0003", &[]),
        ];
        let graph = LinkGraph::build(&records);
        assert_eq!(graph.most_linked(2).len(), 2);
    }
}
