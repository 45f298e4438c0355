//! Bounded top-K ranking.
//!
//! Keeps only the best `K` entries seen so far in a binary min-heap ordered by
//! value, so a ranking over millions of candidates never holds more than `K`
//! of them at once.

use std::{
  cmp::{Ordering, Reverse},
  collections::BinaryHeap,
};

use serde::{Deserialize, Serialize};

/// A display key paired with its accumulated count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankedEntry {
  #[serde(rename = "Key")]
  pub key: String,
  #[serde(rename = "Value")]
  pub value: u64,
}

impl RankedEntry {
  pub fn new(key: impl Into<String>, value: u64) -> Self {
    Self { key: key.into(), value }
  }
}

/// Heap slot compared on `value` only. Keys never take part in ordering, so
/// equal values have no defined order relative to each other.
#[derive(Debug)]
struct ByValue(RankedEntry);

impl PartialEq for ByValue {
  fn eq(&self, other: &Self) -> bool {
    self.0.value == other.0.value
  }
}

impl Eq for ByValue {}

impl PartialOrd for ByValue {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for ByValue {
  fn cmp(&self, other: &Self) -> Ordering {
    self.0.value.cmp(&other.0.value)
  }
}

/// Fixed-capacity ranking of [`RankedEntry`] values.
///
/// `len() <= capacity()` holds after every call. A capacity of zero is valid
/// and always drains to an empty list.
#[derive(Debug)]
pub struct BoundedRanking {
  capacity: usize,
  heap: BinaryHeap<Reverse<ByValue>>,
}

impl BoundedRanking {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      // +1 because an insert briefly overshoots before evicting
      heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(4096)),
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn len(&self) -> usize {
    self.heap.len()
  }

  pub fn is_empty(&self) -> bool {
    self.heap.is_empty()
  }

  /// Smallest value currently kept, if any.
  pub fn floor(&self) -> Option<u64> {
    self.heap.peek().map(|Reverse(ByValue(entry))| entry.value)
  }

  /// Offer a candidate.
  ///
  /// The candidate is pushed unconditionally and the minimum is evicted when
  /// the heap grows past capacity. A candidate at or below the current floor
  /// may therefore be the one evicted.
  pub fn insert(&mut self, key: impl Into<String>, value: u64) {
    self.heap.push(Reverse(ByValue(RankedEntry::new(key, value))));
    if self.heap.len() > self.capacity {
      self.heap.pop();
    }
  }

  /// Remove every entry, most significant first.
  pub fn drain(&mut self) -> Vec<RankedEntry> {
    let mut out = Vec::with_capacity(self.heap.len());
    while let Some(Reverse(ByValue(entry))) = self.heap.pop() {
      out.push(entry);
    }
    out.reverse();
    out
  }
}
