//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.

mod decision_parser;
mod document_reader;
mod evidence_store;
mod metric_config_store;
mod metric_source;
mod signal_feed;

pub use decision_parser::DecisionParser;
pub use document_reader::{DocumentReader, RawDocument};
pub use evidence_store::EvidenceStore;
pub use metric_config_store::MetricConfigStore;
pub use metric_source::{MetricSource, MetricSourceError};
pub use signal_feed::{RawLogEntry, SignalFeed};
