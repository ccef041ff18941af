//! Global request timeline: requests per wall-clock second.

use chrono::Timelike;
use std::collections::BTreeMap;

use crate::store::RecordStore;
use crate::types::TrafficPoint;

/// One point per second that saw traffic, ascending by time.
pub fn requests_per_second(store: &RecordStore) -> Vec<TrafficPoint> {
  let mut buckets: BTreeMap<i64, TrafficPoint> = BTreeMap::new();
  for ts in store.timestamps() {
    let second = ts.with_nanosecond(0).unwrap_or(*ts);
    buckets
      .entry(second.timestamp())
      .or_insert(TrafficPoint { second, count: 0 })
      .count += 1;
  }
  buckets.into_values().collect()
}

/// The second with the most requests; earliest wins a tie.
pub fn busiest_second(points: &[TrafficPoint]) -> Option<TrafficPoint> {
  points
    .iter()
    .fold(None::<&TrafficPoint>, |best, p| match best {
      Some(b) if b.count >= p.count => Some(b),
      _ => Some(p),
    })
    .cloned()
}
