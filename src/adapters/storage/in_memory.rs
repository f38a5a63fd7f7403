//! In-memory storage adapters, used in tests and throwaway runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::evidence::EvidenceCollection;
use crate::domain::foundation::{DecisionId, EngineError};
use crate::domain::metrics::MetricConfiguration;
use crate::ports::{EvidenceStore, MetricConfigStore};

/// Metric configuration store backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetricConfigStore {
    configs: Arc<RwLock<Option<Vec<MetricConfiguration>>>>,
}

impl InMemoryMetricConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetricConfigStore for InMemoryMetricConfigStore {
    async fn load(&self) -> Result<Option<Vec<MetricConfiguration>>, EngineError> {
        Ok(self.configs.read().await.clone())
    }

    async fn save(&self, configs: &[MetricConfiguration]) -> Result<(), EngineError> {
        *self.configs.write().await = Some(configs.to_vec());
        Ok(())
    }
}

/// Evidence store backed by process memory. Keeps per-decision histories in
/// insertion order, re-sorted by collection date on read.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvidenceStore {
    collections: Arc<RwLock<HashMap<DecisionId, Vec<EvidenceCollection>>>>,
}

impl InMemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    async fn append(&self, collection: &EvidenceCollection) -> Result<(), EngineError> {
        self.collections
            .write()
            .await
            .entry(collection.decision_id.clone())
            .or_default()
            .push(collection.clone());
        Ok(())
    }

    async fn list_for_decision(
        &self,
        decision_id: &DecisionId,
    ) -> Result<Vec<EvidenceCollection>, EngineError> {
        let mut listed = self
            .collections
            .read()
            .await
            .get(decision_id)
            .cloned()
            .unwrap_or_default();
        listed.sort_by_key(|c| c.collection_date);
        Ok(listed)
    }
}
