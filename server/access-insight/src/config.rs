//! Analyzer configuration with sane defaults.

use chrono::Duration;

use crate::error::AnalyzerError;

/// Tunable knobs for burst detection and ranking.
#[derive(Debug, Clone)]
pub struct Config {
  /// Sliding window length in seconds. A window spanning exactly this long is still one window.
  pub window_secs: u64,
  /// A source is flagged when its peak window count is strictly greater than this.
  pub suspect_threshold: usize,
  /// How many entries the source and status rankings keep.
  pub top_n: usize,
  /// Include the per-second traffic series in the report.
  pub timeline: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      window_secs: 60,
      suspect_threshold: 30,
      top_n: 5,
      timeline: false,
    }
  }
}

impl Config {
  pub fn window(&self) -> Duration {
    let secs = i64::try_from(self.window_secs).unwrap_or(i64::MAX);
    Duration::seconds(secs.min(i64::MAX / 1000))
  }

  pub fn validate(&self) -> Result<(), AnalyzerError> {
    if self.window_secs == 0 {
      return Err(AnalyzerError::invalid_config("window_secs", "must be at least 1"));
    }
    // Duration::seconds panics past i64::MAX milliseconds.
    if self.window_secs > (i64::MAX / 1000) as u64 {
      return Err(AnalyzerError::invalid_config("window_secs", "out of range"));
    }
    if self.top_n == 0 {
      return Err(AnalyzerError::invalid_config("top_n", "must be at least 1"));
    }
    Ok(())
  }
}
