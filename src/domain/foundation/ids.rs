//! Strongly-typed identifier value objects.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::EngineError;

static DECISION_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+-\d{4}$").expect("valid decision id pattern"));

/// Identifier of a decision record, in the `PREFIX-NNNN` form encoded by
/// the document filename (e.g. `ADR-0007`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(String);

impl DecisionId {
    /// Builds an id from a document prefix and sequence number,
    /// zero-padding the number to four digits.
    pub fn from_parts(prefix: &str, number: u32) -> Self {
        Self(format!("{}-{:04}", prefix.to_uppercase(), number))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DecisionId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if DECISION_ID_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(EngineError::InvalidDecisionId { id: s.to_string() })
        }
    }
}

/// Unique identifier for a metric configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricConfigId(String);

impl MetricConfigId {
    /// Creates a MetricConfigId from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an evidence collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(Uuid);

impl CollectionId {
    /// Creates a new random CollectionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CollectionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_id_from_parts_zero_pads() {
        let id = DecisionId::from_parts("adr", 7);
        assert_eq!(id.as_str(), "ADR-0007");
    }

    #[test]
    fn decision_id_parses_valid_form() {
        let id: DecisionId = "ADR-0123".parse().unwrap();
        assert_eq!(id.to_string(), "ADR-0123");
    }

    #[test]
    fn decision_id_rejects_unpadded_number() {
        let result = "ADR-12".parse::<DecisionId>();
        assert!(matches!(result, Err(EngineError::InvalidDecisionId { .. })));
    }

    #[test]
    fn decision_id_rejects_lowercase_prefix() {
        assert!("adr-0001".parse::<DecisionId>().is_err());
    }

    #[test]
    fn decision_id_serializes_as_plain_string() {
        let id: DecisionId = "ADR-0042".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ADR-0042\"");
    }

    #[test]
    fn collection_id_generates_unique_values() {
        assert_ne!(CollectionId::new(), CollectionId::new());
    }
}
