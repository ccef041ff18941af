//! Columnar in-memory record store shared by every analysis pass.

use chrono::{DateTime, FixedOffset};
use std::io::BufRead;
use tracing::{debug, warn};

use crate::error::AnalyzerError;
use crate::parse::tokenize_line;
use crate::types::{LogRecord, ParseSummary};

/// Skipped lines beyond this many are counted but not logged individually.
const MAX_LOGGED_SKIPS: usize = 10;

/// One column per field. Rows only enter through `push`, so every column has
/// the same length and index `i` is the same record across all of them.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
  source_addresses: Vec<String>,
  timestamps: Vec<DateTime<FixedOffset>>,
  methods: Vec<String>,
  urls: Vec<String>,
  status_codes: Vec<String>,
  response_sizes: Vec<String>,
  client_ids: Vec<String>,
}

impl RecordStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Tokenize every line. Blank lines are ignored, lines with an unparseable
  /// timestamp are skipped and counted; the batch never aborts.
  pub fn from_lines<I, S>(lines: I) -> (Self, ParseSummary)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut store = Self::new();
    let mut summary = ParseSummary::default();
    for (idx, line) in lines.into_iter().enumerate() {
      store.ingest(idx + 1, line.as_ref(), &mut summary);
    }
    (store, summary)
  }

  /// Same as `from_lines`, reading from a buffered source. A line that is
  /// not valid UTF-8 is skipped and counted; only I/O errors abort.
  pub fn from_reader<R: BufRead>(mut reader: R) -> Result<(Self, ParseSummary), AnalyzerError> {
    let mut store = Self::new();
    let mut summary = ParseSummary::default();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
      buf.clear();
      if reader.read_until(b'\n', &mut buf)? == 0 {
        break;
      }
      line_no += 1;
      let bytes = trim_line_ending(&buf);
      match std::str::from_utf8(bytes) {
        Ok(line) => store.ingest(line_no, line, &mut summary),
        Err(e) => {
          summary.total_lines += 1;
          summary.skipped += 1;
          if summary.skipped <= MAX_LOGGED_SKIPS {
            warn!(line = line_no, error = %e, "skipping line: invalid utf-8");
          } else {
            debug!(line = line_no, error = %e, "skipping line: invalid utf-8");
          }
        }
      }
    }
    Ok((store, summary))
  }

  fn ingest(&mut self, line_no: usize, line: &str, summary: &mut ParseSummary) {
    summary.total_lines += 1;
    if line.trim().is_empty() {
      summary.blank += 1;
      return;
    }

    match tokenize_line(line) {
      Ok(tokenized) => {
        if tokenized.degraded {
          summary.degraded += 1;
        }
        self.push(tokenized.record);
        summary.parsed += 1;
      }
      Err(e) => {
        summary.skipped += 1;
        let e = e.at_line(line_no);
        if summary.skipped <= MAX_LOGGED_SKIPS {
          warn!(error = %e, "skipping line");
        } else {
          debug!(error = %e, "skipping line");
        }
      }
    }
  }

  pub fn push(&mut self, record: LogRecord) {
    self.source_addresses.push(record.source_address);
    self.timestamps.push(record.timestamp);
    self.methods.push(record.method);
    self.urls.push(record.url);
    self.status_codes.push(record.status_code);
    self.response_sizes.push(record.response_size);
    self.client_ids.push(record.client_id);
  }

  pub fn len(&self) -> usize {
    self.source_addresses.len()
  }

  pub fn is_empty(&self) -> bool {
    self.source_addresses.is_empty()
  }

  pub fn source_addresses(&self) -> &[String] {
    &self.source_addresses
  }

  pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
    &self.timestamps
  }

  pub fn methods(&self) -> &[String] {
    &self.methods
  }

  pub fn urls(&self) -> &[String] {
    &self.urls
  }

  pub fn status_codes(&self) -> &[String] {
    &self.status_codes
  }

  pub fn response_sizes(&self) -> &[String] {
    &self.response_sizes
  }

  pub fn client_ids(&self) -> &[String] {
    &self.client_ids
  }

  /// Reassemble row `i`, or `None` when out of range.
  pub fn record(&self, i: usize) -> Option<LogRecord> {
    if i >= self.len() {
      return None;
    }
    Some(LogRecord {
      source_address: self.source_addresses[i].clone(),
      timestamp: self.timestamps[i],
      method: self.methods[i].clone(),
      url: self.urls[i].clone(),
      status_code: self.status_codes[i].clone(),
      response_size: self.response_sizes[i].clone(),
      client_id: self.client_ids[i].clone(),
    })
  }

  pub fn iter(&self) -> impl Iterator<Item = LogRecord> + '_ {
    (0..self.len()).filter_map(move |i| self.record(i))
  }
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
  let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
  buf.strip_suffix(b"\r").unwrap_or(buf)
}

impl FromIterator<LogRecord> for RecordStore {
  fn from_iter<T: IntoIterator<Item = LogRecord>>(iter: T) -> Self {
    let mut store = Self::new();
    for record in iter {
      store.push(record);
    }
    store
  }
}
