//! Core types for the analyzer (parsed records + report contracts).

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder for a field that could not be recovered from the line.
pub const SENTINEL: &str = "-";

// ---------------------------------------------------------------------------
// Parsed records
// ---------------------------------------------------------------------------

/// One parsed request entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
  /// Opaque grouping key; not validated as an IP.
  pub source_address: String,
  pub timestamp: DateTime<FixedOffset>,
  pub method: String,
  pub url: String,
  /// Kept as text: malformed lines may carry placeholders.
  pub status_code: String,
  pub response_size: String,
  pub client_id: String,
}

/// Line accounting for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
  pub total_lines: usize,
  pub parsed: usize,
  /// Lines dropped because their timestamp could not be parsed.
  pub skipped: usize,
  /// Parsed lines where at least one field fell back to the sentinel.
  pub degraded: usize,
  pub blank: usize,
}

// ---------------------------------------------------------------------------
// Burst alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertClass {
  LikelyBot,
  SuspiciousTraffic,
}

impl AlertClass {
  pub fn tag(self) -> &'static str {
    match self {
      Self::LikelyBot => "likely-bot",
      Self::SuspiciousTraffic => "suspicious-traffic",
    }
  }
}

impl fmt::Display for AlertClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag())
  }
}

/// A source whose peak window count crossed the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurstAlert {
  pub source_address: String,
  pub peak_count: usize,
  pub classification: AlertClass,
}

impl BurstAlert {
  /// Human-readable alert value, e.g. "42 requests (likely bot)".
  pub fn describe(&self) -> String {
    let label = match self.classification {
      AlertClass::LikelyBot => "likely bot",
      AlertClass::SuspiciousTraffic => "suspicious traffic",
    };
    format!("{} requests ({})", self.peak_count, label)
  }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedValue {
  pub value: String,
  pub count: usize,
}

/// Client-string breakdown. Percentages are over `bot + mobile + desktop`,
/// which overlap (a mobile bot counts twice), so they need not sum to 100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientBreakdown {
  pub bot: usize,
  pub mobile: usize,
  pub desktop: usize,
  pub chrome: usize,
  pub firefox: usize,
  pub bing: usize,
  pub mobile_pct: usize,
  pub desktop_pct: usize,
  pub bot_pct: usize,
}

/// Request count for one wall-clock second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficPoint {
  pub second: DateTime<FixedOffset>,
  pub count: usize,
}

// ---------------------------------------------------------------------------
// Output types (what the binary emits)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub records: usize,
  pub top_sources: Vec<RankedValue>,
  pub top_statuses: Vec<RankedValue>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub clients: Option<ClientBreakdown>,
  /// Flagged source -> formatted alert value.
  pub alerts: BTreeMap<String, String>,
  pub burst_alerts: Vec<BurstAlert>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub busiest_second: Option<TrafficPoint>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeline: Option<Vec<TrafficPoint>>,
  pub summary: ParseSummary,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub notes: Vec<String>,
}
