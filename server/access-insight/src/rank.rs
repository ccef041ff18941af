//! Top-N frequency ranking over categorical columns.

use std::collections::HashMap;

use crate::types::RankedValue;

/// Count distinct values and keep the `n` most frequent.
///
/// Ties keep first-encountered order, so the result is deterministic for a
/// given input order.
pub fn top_n<I, S>(values: I, n: usize) -> Vec<RankedValue>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut slots: HashMap<String, usize> = HashMap::new();
  let mut ranked: Vec<RankedValue> = Vec::new();

  for value in values {
    let value = value.as_ref();
    match slots.get(value) {
      Some(&slot) => ranked[slot].count += 1,
      None => {
        slots.insert(value.to_string(), ranked.len());
        ranked.push(RankedValue {
          value: value.to_string(),
          count: 1,
        });
      }
    }
  }

  // sort_by is stable: equal counts stay in insertion order.
  ranked.sort_by(|a, b| b.count.cmp(&a.count));
  ranked.truncate(n);
  ranked
}
