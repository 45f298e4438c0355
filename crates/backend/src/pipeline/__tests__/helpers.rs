//! Test helpers for pipeline tests.
//!
//! `Fixture` writes CSV inputs into a temporary directory so each test runs
//! the real readers against real files.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::{
  pipeline::{PipelineOptions, PipelineRequest},
  ranking::RankedEntry,
};

pub struct Fixture {
  pub dir: TempDir,
}

impl Fixture {
  pub fn new() -> Self {
    Self {
      dir: TempDir::new().expect("create temp dir"),
    }
  }

  /// Write `lines` joined by newlines and return the path
  pub fn write(&self, name: &str, lines: &[&str]) -> PathBuf {
    let path = self.dir.path().join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).expect("write fixture");
    path
  }

  pub fn write_owned(&self, name: &str, lines: &[String]) -> PathBuf {
    let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
    self.write(name, &borrowed)
  }

  /// Path inside the fixture dir that is never created
  pub fn missing(&self, name: &str) -> PathBuf {
    self.dir.path().join(name)
  }
}

/// Small queues so backpressure is exercised in every test
pub fn request(count: usize) -> PipelineRequest {
  PipelineRequest::new(count).with_options(PipelineOptions {
    queue_capacity: 2,
    ..Default::default()
  })
}

pub fn entry(key: &str, value: u64) -> RankedEntry {
  RankedEntry::new(key, value)
}

/// Result sorted by key, for comparisons that must ignore tie order
pub fn sorted(mut entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
  entries.sort_by(|a, b| a.key.cmp(&b.key));
  entries
}

pub fn assert_descending(entries: &[RankedEntry]) {
  for pair in entries.windows(2) {
    assert!(
      pair[0].value >= pair[1].value,
      "result not descending: {:?} before {:?}",
      pair[0],
      pair[1]
    );
  }
}
