//! Decision records and their embedded evidence.

mod evidence_item;
mod record;

pub use evidence_item::{EvidenceItem, EvidenceType, EvidenceValue, TrendDirection};
pub use record::{
    Complexity, Consequences, DecisionRecord, DecisionStatus, Impact, ImplementationStatus,
    RecordMetadata,
};
