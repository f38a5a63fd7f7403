//! Storage adapters for metric configurations and evidence history.

mod file_evidence_store;
mod file_metric_config_store;
mod in_memory;

pub use file_evidence_store::FileEvidenceStore;
pub use file_metric_config_store::FileMetricConfigStore;
pub use in_memory::{InMemoryEvidenceStore, InMemoryMetricConfigStore};
