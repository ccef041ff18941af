//! Access Insight — deterministic batch analysis of web-server access logs.
//!
//! Tokenizes combined-format lines into a columnar store, ranks top sources
//! and status codes, breaks client strings down by browser/device/bot, and
//! flags sources whose request rate bursts inside a sliding time window.
//!
//! No DB, no network; pure computation over the whole input.

pub mod analyzer;
pub mod burst;
pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod rank;
pub mod report;
pub mod store;
pub mod traffic;
pub mod types;

pub use analyzer::Analyzer;
pub use config::Config;
pub use error::AnalyzerError;
pub use store::RecordStore;
pub use types::{BurstAlert, LogRecord, Report};
