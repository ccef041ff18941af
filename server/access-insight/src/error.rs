//! Structured error types for the analyzer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
  #[error("malformed timestamp{}: {value:?}: {reason}", line_suffix(.line))]
  MalformedTimestamp {
    line: Option<usize>,
    value: String,
    reason: String,
  },

  /// Diagnostic only: the tokenizer logs it for short lines and falls back
  /// to sentinel fields instead of returning it.
  #[error("malformed segment: expected 6 quote segments, found {segments}")]
  MalformedSegment { segments: usize },

  #[error("empty input: {0}")]
  EmptyInput(&'static str),

  #[error("division by zero: {0}")]
  DivisionByZero(&'static str),

  #[error("config: {field}: {reason}")]
  InvalidConfig { field: String, reason: String },

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
  match line {
    Some(n) => format!(" at line {}", n),
    None => String::new(),
  }
}

impl AnalyzerError {
  pub fn timestamp(value: &str, reason: impl Into<String>) -> Self {
    Self::MalformedTimestamp {
      line: None,
      value: value.to_string(),
      reason: reason.into(),
    }
  }

  pub fn invalid_config(field: &str, reason: &str) -> Self {
    Self::InvalidConfig {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  /// Attach a 1-based input line number to a per-line error.
  pub fn at_line(self, n: usize) -> Self {
    match self {
      Self::MalformedTimestamp { value, reason, .. } => Self::MalformedTimestamp {
        line: Some(n),
        value,
        reason,
      },
      other => other,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamp_error_mentions_line_when_known() {
    let err = AnalyzerError::timestamp("garbage", "input contains invalid characters").at_line(7);
    let msg = err.to_string();
    assert!(msg.contains("at line 7"), "{}", msg);
    assert!(msg.contains("garbage"));
  }

  #[test]
  fn segment_error_reports_count() {
    let err = AnalyzerError::MalformedSegment { segments: 3 };
    assert_eq!(err.to_string(), "malformed segment: expected 6 quote segments, found 3");
  }

  #[test]
  fn timestamp_error_without_line() {
    let err = AnalyzerError::timestamp("x", "too short");
    assert_eq!(err.to_string(), "malformed timestamp: \"x\": too short");
  }
}
