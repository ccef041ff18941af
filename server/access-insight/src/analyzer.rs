//! Core analyzer: runs every pass over a RecordStore and assembles the Report.

use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::burst;
use crate::client;
use crate::config::Config;
use crate::error::AnalyzerError;
use crate::rank;
use crate::store::RecordStore;
use crate::traffic;
use crate::types::*;

pub struct Analyzer {
  config: Config,
}

impl Analyzer {
  pub fn new(config: Config) -> Result<Self, AnalyzerError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn with_defaults() -> Self {
    Self {
      config: Config::default(),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Parse raw lines and analyze them in one go.
  pub fn analyze_lines<I, S>(&self, lines: I) -> Report
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let (store, summary) = RecordStore::from_lines(lines);
    self.analyze(&store, summary)
  }

  /// Analyze a built store. Never fails: an unavailable client breakdown is
  /// reported through `Report::notes`.
  pub fn analyze(&self, store: &RecordStore, summary: ParseSummary) -> Report {
    let mut notes = Vec::new();

    let top_sources = rank::top_n(store.source_addresses(), self.config.top_n);
    let top_statuses = rank::top_n(store.status_codes(), self.config.top_n);

    let clients = match client::aggregate(store.client_ids()) {
      Ok(breakdown) => Some(breakdown),
      Err(e) => {
        warn!(error = %e, "client breakdown unavailable");
        notes.push(format!("client breakdown unavailable: {}", e));
        None
      }
    };

    let burst_alerts = burst::detect(store, &self.config);
    let alerts: BTreeMap<String, String> = burst_alerts
      .iter()
      .map(|a| (a.source_address.clone(), a.describe()))
      .collect();

    let points = traffic::requests_per_second(store);
    let busiest_second = traffic::busiest_second(&points);
    let timeline = self.config.timeline.then_some(points);

    if summary.skipped > 0 {
      notes.push(format!(
        "{} line(s) skipped: unparseable timestamp or encoding",
        summary.skipped
      ));
    }

    info!(
      records = store.len(),
      skipped = summary.skipped,
      degraded = summary.degraded,
      alerts = burst_alerts.len(),
      "analysis complete"
    );

    Report {
      records: store.len(),
      top_sources,
      top_statuses,
      clients,
      alerts,
      burst_alerts,
      busiest_second,
      timeline,
      summary,
      notes,
    }
  }
}
