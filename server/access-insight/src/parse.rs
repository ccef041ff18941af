//! Tokenize one combined-format access-log line into a LogRecord.
//!
//! The line is cut on `"` so quoted spans (request line, referrer, client
//! string) alternate with the unquoted fields between them:
//!
//! ```text
//! 0: SRC IDENT USER [DD/Mon/YYYY:HH:MM:SS +ZZZZ]
//! 1: METHOD URL PROTOCOL
//! 2:  STATUS SIZE
//! 3: REFERRER
//! 4:  (space)
//! 5: CLIENT_ID
//! ```

use chrono::{DateTime, FixedOffset};

use crate::error::AnalyzerError;
use crate::types::{LogRecord, SENTINEL};

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S%z";
const FULL_SEGMENTS: usize = 6;

/// A parsed line plus whether any field had to fall back to the sentinel.
#[derive(Debug, Clone)]
pub struct Tokenized {
  pub record: LogRecord,
  pub degraded: bool,
}

/// Parse one line. Only an unparseable timestamp is an error; every other
/// missing field becomes `"-"` and marks the result as degraded.
pub fn tokenize_line(line: &str) -> Result<Tokenized, AnalyzerError> {
  let parts: Vec<&str> = line.split('"').collect();
  let mut degraded = parts.len() < FULL_SEGMENTS;

  let left: Vec<&str> = parts[0].split_whitespace().collect();
  let source_address = left.first().copied().unwrap_or(SENTINEL).to_string();
  let timestamp = match left.as_slice() {
    [.., date, zone] => parse_timestamp(date, zone)?,
    _ => return Err(AnalyzerError::timestamp(parts[0].trim(), "missing date/zone tokens")),
  };

  let request: Vec<&str> = parts
    .get(1)
    .map(|s| s.split_whitespace().collect())
    .unwrap_or_default();
  let (method, url) = match request.as_slice() {
    [method, url, ..] => (method.to_string(), url.to_string()),
    _ => {
      degraded = true;
      (SENTINEL.to_string(), SENTINEL.to_string())
    }
  };

  let extra: Vec<&str> = parts
    .get(2)
    .map(|s| s.split_whitespace().collect())
    .unwrap_or_default();
  let (status_code, response_size) = match extra.as_slice() {
    [status, size, ..] => (status.to_string(), size.to_string()),
    _ => {
      degraded = true;
      (SENTINEL.to_string(), SENTINEL.to_string())
    }
  };

  let client_id = parts
    .get(5)
    .map(|s| s.trim().to_string())
    .unwrap_or_else(|| SENTINEL.to_string());

  if parts.len() < FULL_SEGMENTS {
    tracing::debug!(
      error = %AnalyzerError::MalformedSegment { segments: parts.len() },
      source = %source_address,
      "degraded line"
    );
  }

  Ok(Tokenized {
    record: LogRecord {
      source_address,
      timestamp,
      method,
      url,
      status_code,
      response_size,
      client_id,
    },
    degraded,
  })
}

/// Rebuild `[10/Oct/2000:13:55:36` + `-0700]` into one timestamp.
fn parse_timestamp(date: &str, zone: &str) -> Result<DateTime<FixedOffset>, AnalyzerError> {
  let date = date.strip_prefix('[').unwrap_or(date);
  let zone = zone.strip_suffix(']').unwrap_or(zone);
  let joined = format!("{}{}", date, zone);
  DateTime::parse_from_str(&joined, TIMESTAMP_FORMAT)
    .map_err(|e| AnalyzerError::timestamp(&joined, e.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Timelike};

  const LINE: &str = r#"203.0.113.9 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326 "http://www.example.com/start.html" "Mozilla/4.08 [en] (Win98; I ;Nav)""#;

  #[test]
  fn full_line_recovers_every_field() {
    let out = tokenize_line(LINE).unwrap();
    let r = out.record;
    assert!(!out.degraded);
    assert_eq!(r.source_address, "203.0.113.9");
    assert_eq!(r.method, "GET");
    assert_eq!(r.url, "/apache_pb.gif");
    assert_eq!(r.status_code, "200");
    assert_eq!(r.response_size, "2326");
    assert_eq!(r.client_id, "Mozilla/4.08 [en] (Win98; I ;Nav)");

    let offset = FixedOffset::west_opt(7 * 3600).unwrap();
    let expected = offset.with_ymd_and_hms(2000, 10, 10, 13, 55, 36).unwrap();
    assert_eq!(r.timestamp, expected);
    assert_eq!(r.timestamp.hour(), 13);
  }

  #[test]
  fn bad_timestamp_is_an_error() {
    let line = r#"1.2.3.4 - - [99/Foo/2000:13:55:36 -0700] "GET / HTTP/1.1" 200 1 "-" "x""#;
    let err = tokenize_line(line).unwrap_err();
    assert!(matches!(err, AnalyzerError::MalformedTimestamp { .. }));
  }

  #[test]
  fn missing_date_tokens_is_an_error() {
    let err = tokenize_line("1.2.3.4").unwrap_err();
    assert!(matches!(err, AnalyzerError::MalformedTimestamp { .. }));
  }

  #[test]
  fn dash_status_and_size_kept_as_text() {
    let line = r#"1.2.3.4 - - [01/Jan/2024:00:00:00 +0000] "GET / HTTP/1.1" - - "-" "curl/8.0""#;
    let out = tokenize_line(line).unwrap();
    assert_eq!(out.record.status_code, "-");
    assert_eq!(out.record.response_size, "-");
    assert!(!out.degraded);
  }

  #[test]
  fn short_status_segment_falls_back_to_sentinel() {
    let line = r#"1.2.3.4 - - [01/Jan/2024:00:00:00 +0000] "GET / HTTP/1.1" 400 "-" "curl/8.0""#;
    let out = tokenize_line(line).unwrap();
    assert_eq!(out.record.status_code, "-");
    assert_eq!(out.record.response_size, "-");
    assert!(out.degraded);
  }

  #[test]
  fn truncated_line_degrades_instead_of_failing() {
    let line = r#"1.2.3.4 - - [01/Jan/2024:00:00:00 +0000] "-" 408 0"#;
    let out = tokenize_line(line).unwrap();
    let r = out.record;
    assert!(out.degraded);
    assert_eq!(r.method, "-");
    assert_eq!(r.url, "-");
    assert_eq!(r.status_code, "408");
    assert_eq!(r.response_size, "0");
    assert_eq!(r.client_id, "-");
  }

  #[test]
  fn client_id_is_trimmed() {
    let line = r#"1.2.3.4 - - [01/Jan/2024:00:00:00 +0000] "GET / HTTP/1.1" 200 5 "-" "  Googlebot/2.1  ""#;
    let out = tokenize_line(line).unwrap();
    assert_eq!(out.record.client_id, "Googlebot/2.1");
  }
}
