//! Demo entry point: loads the corpus, runs one collection pass per
//! decision against scripted sources, and prints a markdown report.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use adr_pulse::adapters::document::{FsDocumentReader, MarkdownDecisionParser};
use adr_pulse::adapters::sources::{ScriptedMetricSource, StaticSignalFeed};
use adr_pulse::adapters::storage::{FileEvidenceStore, FileMetricConfigStore};
use adr_pulse::application::{DecisionEngine, ReportFormat};
use adr_pulse::config::EngineConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::load()?;
    config.validate()?;

    let source = ScriptedMetricSource::new()
        .with_response("rev-list --count --since=7.days HEAD", "14")
        .with_response("build-results.log", "92\n95\n97\n")
        .with_response("latency-p95.log", "210\n230\n")
        .with_response("error-rate.log", "0.4\n0.6\n");

    let engine = DecisionEngine::new(
        Arc::new(FsDocumentReader::new(config.corpus.dir.clone())),
        Arc::new(MarkdownDecisionParser::new()),
        Arc::new(FileMetricConfigStore::new(config.storage.metric_config_path())),
        Arc::new(FileEvidenceStore::new(config.storage.evidence_dir())),
        Arc::new(source),
        Arc::new(StaticSignalFeed::new()),
        config.collection.source_timeout(),
    );

    let loaded = engine.load_corpus().await?;
    info!(decisions = loaded, "corpus loaded");

    for record in engine.get_all_decisions().await {
        match engine.collect(&record.id).await {
            Ok(collection) => info!(
                decision = %record.id,
                health = %collection.summary.overall_health,
                "collected"
            ),
            Err(err) => error!(decision = %record.id, error = %err, "collection failed"),
        }
    }

    let report = engine.generate_report(ReportFormat::Markdown).await?;
    println!("{}", report);
    Ok(())
}
