//! Corpus loading and in-memory decision lookup.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::decision::{DecisionRecord, EvidenceItem};
use crate::domain::foundation::{DecisionId, EngineError};
use crate::domain::graph::{DecisionLink, LinkGraph};
use crate::ports::{DecisionParser, DocumentReader};

#[derive(Default)]
struct CorpusState {
    records: Vec<DecisionRecord>,
    graph: LinkGraph,
}

/// Holds the parsed corpus and its derived link graph.
///
/// Loading is replace-all: the previous snapshot is swapped out atomically,
/// so readers never observe a half-loaded corpus. Unparsable documents are
/// skipped with a warning and do not fail the load.
pub struct DecisionRepository {
    reader: Arc<dyn DocumentReader>,
    parser: Arc<dyn DecisionParser>,
    state: RwLock<CorpusState>,
}

impl DecisionRepository {
    pub fn new(reader: Arc<dyn DocumentReader>, parser: Arc<dyn DecisionParser>) -> Self {
        Self {
            reader,
            parser,
            state: RwLock::new(CorpusState::default()),
        }
    }

    /// Reparses every document and replaces the corpus snapshot.
    /// Returns the number of records loaded.
    pub async fn load_corpus(&self) -> Result<usize, EngineError> {
        let documents = self.reader.read_all().await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in &documents {
            match self.parser.parse(document) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(file = %document.file_name, error = %err, "skipping unparsable document");
                }
            }
        }

        let graph = LinkGraph::build(&records);
        let loaded = records.len();
        info!(
            decisions = loaded,
            links = graph.links().len(),
            "corpus loaded"
        );

        *self.state.write().await = CorpusState { records, graph };
        Ok(loaded)
    }

    /// All records in corpus (filename) order.
    pub async fn all(&self) -> Vec<DecisionRecord> {
        self.state.read().await.records.clone()
    }

    /// One record by id.
    pub async fn get(&self, id: &DecisionId) -> Result<DecisionRecord, EngineError> {
        self.state
            .read()
            .await
            .records
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(id.as_str()))
    }

    /// Derived links touching a decision as either endpoint.
    pub async fn links_for(&self, id: &DecisionId) -> Result<Vec<DecisionLink>, EngineError> {
        let state = self.state.read().await;
        if !state.records.iter().any(|r| &r.id == id) {
            return Err(EngineError::not_found(id.as_str()));
        }
        Ok(state.graph.links_for(id))
    }

    /// Top decisions ranked by inbound link count.
    pub async fn most_linked(&self, n: usize) -> Vec<(DecisionId, usize)> {
        self.state.read().await.graph.most_linked(n)
    }

    /// Appends an evidence item to a record's in-memory snapshot. Lost on
    /// the next corpus reload; durable history lives in the evidence store.
    pub async fn append_evidence(
        &self,
        id: &DecisionId,
        item: EvidenceItem,
    ) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| EngineError::not_found(id.as_str()))?;
        record.evidence.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::MarkdownDecisionParser;
    use crate::ports::RawDocument;
    use async_trait::async_trait;
    use chrono::Utc;

    struct StaticReader {
        documents: Vec<RawDocument>,
    }

    #[async_trait]
    impl DocumentReader for StaticReader {
        async fn read_all(&self) -> Result<Vec<RawDocument>, EngineError> {
            Ok(self.documents.clone())
        }
    }

    fn document(file_name: &str, content: &str) -> RawDocument {
        RawDocument {
            file_name: file_name.to_string(),
            content: content.to_string(),
            last_modified: Utc::now(),
        }
    }

    fn repository(documents: Vec<RawDocument>) -> DecisionRepository {
        DecisionRepository::new(
            Arc::new(StaticReader { documents }),
            Arc::new(MarkdownDecisionParser::new()),
        )
    }

    #[tokio::test]
    async fn load_skips_unparsable_documents() {
        let repo = repository(vec![
            document("ADR-0001-a.md", "# A\n"),
            document("garbage.md", "# Not a decision\n"),
            document("ADR-0002-b.md", "# B\n"),
        ]);

        let loaded = repo.load_corpus().await.unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(repo.all().await.len(), 2);
    }

    #[tokio::test]
    async fn reload_replaces_the_snapshot() {
        let repo = repository(vec![document("ADR-0001-a.md", "# A\n")]);
        repo.load_corpus().await.unwrap();

        let id: DecisionId = "ADR-0001".parse().unwrap();
        repo.append_evidence(&id, EvidenceItem::metric("m", 1.0, "s", 80))
            .await
            .unwrap();
        assert_eq!(repo.get(&id).await.unwrap().evidence.len(), 1);

        // In-memory evidence does not survive a reload.
        repo.load_corpus().await.unwrap();
        assert!(repo.get(&id).await.unwrap().evidence.is_empty());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let repo = repository(vec![]);
        repo.load_corpus().await.unwrap();

        let id: DecisionId = "ADR-0042".parse().unwrap();
        assert!(matches!(
            repo.get(&id).await,
            Err(EngineError::DecisionNotFound { .. })
        ));
        assert!(matches!(
            repo.links_for(&id).await,
            Err(EngineError::DecisionNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn links_are_rebuilt_from_document_references() {
        let repo = repository(vec![
            document("ADR-0001-a.md", "# A\n\nBuilds on ADR-0002.\n"),
            document("ADR-0002-b.md", "# B\n"),
        ]);
        repo.load_corpus().await.unwrap();

        let links = repo.links_for(&"ADR-0002".parse().unwrap()).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].from.as_str(), "ADR-0001");
    }
}
