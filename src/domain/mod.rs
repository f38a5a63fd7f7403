//! Domain layer: decision records, the link graph, metric configuration,
//! evidence collections, and the pure analysis calculators.

pub mod analysis;
pub mod decision;
pub mod evidence;
pub mod foundation;
pub mod graph;
pub mod metrics;
