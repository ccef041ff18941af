//! Per-source sliding-window burst detection.
//!
//! For each source, timestamps are sorted and scanned with a two-pointer
//! window. The window at `end` holds every request no more than
//! `window` older than `timestamps[end]`; a span of exactly `window` still
//! fits. The largest window seen anywhere on the timeline is the peak.

use chrono::{DateTime, Duration, FixedOffset};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::Config;
use crate::store::RecordStore;
use crate::types::{AlertClass, BurstAlert};

/// Client-string markers of automated crawlers.
const BOT_MARKERS: &[&str] = &["bot", "crawler", "spider"];

/// Sort `timestamps` and return the largest number of them that fit in any
/// one window. 0 for an empty slice.
pub fn peak_window(timestamps: &mut [DateTime<FixedOffset>], window: Duration) -> usize {
  timestamps.sort_unstable();

  let mut start = 0;
  let mut peak = 0;
  for end in 0..timestamps.len() {
    while timestamps[end] - timestamps[start] > window {
      start += 1;
    }
    peak = peak.max(end - start + 1);
  }
  peak
}

/// Flag every source whose peak window count exceeds `config.suspect_threshold`.
///
/// Alerts come back ordered by source address.
pub fn detect(store: &RecordStore, config: &Config) -> Vec<BurstAlert> {
  let window = config.window();
  let sources = store.source_addresses();
  let timestamps = store.timestamps();
  let client_ids = store.client_ids();

  // Row indices per source.
  let mut rows: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
  for (i, source) in sources.iter().enumerate() {
    rows.entry(source.as_str()).or_default().push(i);
  }

  let mut alerts = Vec::new();
  for (source, indices) in &rows {
    let mut times: Vec<DateTime<FixedOffset>> = indices.iter().map(|&i| timestamps[i]).collect();
    let peak = peak_window(&mut times, window);
    if peak <= config.suspect_threshold {
      continue;
    }

    let classification = classify_source(indices.iter().map(|&i| client_ids[i].as_str()));
    debug!(source = %source, peak, %classification, "burst detected");
    alerts.push(BurstAlert {
      source_address: source.to_string(),
      peak_count: peak,
      classification,
    });
  }
  alerts
}

/// `LikelyBot` when any of the source's client strings carries a bot marker.
pub fn classify_source<'a, I>(client_ids: I) -> AlertClass
where
  I: IntoIterator<Item = &'a str>,
{
  let is_bot = client_ids.into_iter().any(|ua| {
    let ua = ua.to_lowercase();
    BOT_MARKERS.iter().any(|m| ua.contains(m))
  });
  if is_bot {
    AlertClass::LikelyBot
  } else {
    AlertClass::SuspiciousTraffic
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::LogRecord;
  use chrono::TimeZone;

  fn at(secs: i64) -> DateTime<FixedOffset> {
    let base = FixedOffset::east_opt(0)
      .unwrap()
      .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
      .unwrap();
    base + Duration::seconds(secs)
  }

  fn at_ms(ms: i64) -> DateTime<FixedOffset> {
    at(0) + Duration::milliseconds(ms)
  }

  fn record(source: &str, ts: DateTime<FixedOffset>, ua: &str) -> LogRecord {
    LogRecord {
      source_address: source.into(),
      timestamp: ts,
      method: "GET".into(),
      url: "/".into(),
      status_code: "200".into(),
      response_size: "10".into(),
      client_id: ua.into(),
    }
  }

  #[test]
  fn empty_and_single() {
    assert_eq!(peak_window(&mut [], Duration::seconds(60)), 0);
    assert_eq!(peak_window(&mut [at(5)], Duration::seconds(60)), 1);
  }

  #[test]
  fn dense_burst_counts_everything() {
    // 31 requests within ten seconds.
    let mut times: Vec<_> = (0..31).map(|i| at_ms(i * 320)).collect();
    assert_eq!(peak_window(&mut times, Duration::seconds(60)), 31);
  }

  #[test]
  fn exactly_window_apart_is_one_window() {
    let mut times: Vec<_> = (0..29).map(at).collect();
    times.push(at(60));
    assert_eq!(peak_window(&mut times, Duration::seconds(60)), 30);
  }

  #[test]
  fn one_millisecond_past_window_splits() {
    let mut times = vec![at(0), at_ms(60_001)];
    assert_eq!(peak_window(&mut times, Duration::seconds(60)), 1);
  }

  #[test]
  fn peak_not_final_window() {
    // 35 early requests, then 5 requests an hour later.
    let mut times: Vec<_> = (0..35).map(at).collect();
    times.extend((0..5).map(|i| at(3600 + i)));
    assert_eq!(peak_window(&mut times, Duration::seconds(60)), 35);
  }

  #[test]
  fn unsorted_input_is_sorted_first() {
    let mut times: Vec<_> = (0..40).rev().map(|i| at(i * 1000)).collect();
    times.extend((0..10).rev().map(|i| at(500_000 + i)));
    assert_eq!(peak_window(&mut times, Duration::seconds(60)), 10);
  }

  #[test]
  fn threshold_is_strict() {
    let store: RecordStore = (0..30).map(|i| record("10.0.0.1", at(i), "curl/8.0")).collect();
    assert!(detect(&store, &Config::default()).is_empty());

    let store: RecordStore = (0..31).map(|i| record("10.0.0.1", at(i), "curl/8.0")).collect();
    let alerts = detect(&store, &Config::default());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].peak_count, 31);
    assert_eq!(alerts[0].classification, AlertClass::SuspiciousTraffic);
  }

  #[test]
  fn sources_are_isolated() {
    // A: 40 requests in 40 s. B: one request every 30 s, interleaved.
    let mut records: Vec<LogRecord> = (0..40).map(|i| record("a", at(i), "curl/8.0")).collect();
    records.extend((0..20).map(|i| record("b", at(i * 30), "curl/8.0")));
    let store: RecordStore = records.into_iter().collect();

    let alerts = detect(&store, &Config::default());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].source_address, "a");
    assert_eq!(alerts[0].peak_count, 40);
  }

  #[test]
  fn any_bot_marker_classifies_source() {
    let mut records: Vec<LogRecord> = (0..31).map(|i| record("crawl", at(i), "Mozilla/5.0")).collect();
    records.push(record("crawl", at(100), "Baiduspider/2.0"));
    records.extend((0..31).map(|i| record("human", at(i), "Mozilla/5.0 Firefox")));
    let store: RecordStore = records.into_iter().collect();

    let alerts = detect(&store, &Config::default());
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].source_address, "crawl");
    assert_eq!(alerts[0].classification, AlertClass::LikelyBot);
    assert_eq!(alerts[1].source_address, "human");
    assert_eq!(alerts[1].classification, AlertClass::SuspiciousTraffic);
  }

  #[test]
  fn knobs_are_honoured() {
    let store: RecordStore = (0..6).map(|i| record("x", at(i * 10), "WebCrawler")).collect();
    let config = Config {
      window_secs: 20,
      suspect_threshold: 2,
      ..Config::default()
    };
    let alerts = detect(&store, &config);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].peak_count, 3);
    assert_eq!(alerts[0].classification, AlertClass::LikelyBot);
  }

  #[test]
  fn classify_source_is_case_insensitive() {
    assert_eq!(classify_source(["Mozilla", "GoogleBOT"]), AlertClass::LikelyBot);
    assert_eq!(classify_source(["Mozilla", "-"]), AlertClass::SuspiciousTraffic);
    assert_eq!(classify_source(Vec::<&str>::new()), AlertClass::SuspiciousTraffic);
  }
}
