//! Application layer: use-case services wired over the ports.

mod analytics;
mod analyzer;
mod collector;
mod engine;
mod report;
mod repository;

pub use analytics::{
    AnalyticsService, DecisionAnalytics, DecisionSummary, LinkedDecisionSummary, SearchFilters,
};
pub use analyzer::TrendAnalyzer;
pub use collector::EvidenceCollector;
pub use engine::DecisionEngine;
pub use report::{DecisionReport, DecisionReportEntry, ReportFormat, ReportGenerator};
pub use repository::DecisionRepository;
