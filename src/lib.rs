//! ADR Pulse - Decision-Evidence Graph and Trend-Analytics Engine
//!
//! Parses a corpus of markdown architecture decision records, derives a
//! cross-reference graph, collects measurable evidence around each
//! decision, and reports health and trend signals over time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
