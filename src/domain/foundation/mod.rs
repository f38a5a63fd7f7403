//! Foundation value objects shared across the domain.

mod errors;
mod ids;

pub use errors::EngineError;
pub use ids::{CollectionId, DecisionId, MetricConfigId};
