//! Streaming join pipelines
//!
//! Every pipeline follows the same shape:
//!
//! ```text
//! Streaming → Joining → Ranking → Resolving → Done
//!      └──────────┴─────────┴──────────┴────→ Failed
//! ```
//!
//! One reader task per input file feeds a bounded queue, and a single
//! aggregator task drains the queues in the order its join needs. The
//! aggregator owns every map and the [`BoundedRanking`]; nothing else touches
//! them. The drained ranking is handed back through a oneshot channel.
//!
//! Consumption order across files is enforced only by the aggregator reading
//! one queue to exhaustion before starting the next. Readers for later files
//! simply block on backpressure until then.

mod commits;
mod events;
mod users;


use std::{collections::HashMap, future::Future, path::PathBuf, time::Instant};

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub use self::{
  commits::{CommitInputs, top_repos_by_commits},
  events::{EventInputs, top_repos_by_events},
  users::{UserInputs, top_users_by_commits},
};
use crate::{
  actor::{ReaderOptions, StreamError, TaskGroup, TaskPanicked, log_interrupt, read_lines},
  config::EventTags,
  ranking::{BoundedRanking, RankedEntry},
};

/// Tuning shared by all pipelines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
  /// Pending records per input queue
  pub queue_capacity: usize,
  pub reader: ReaderOptions,
  pub tags: EventTags,
}

impl Default for PipelineOptions {
  fn default() -> Self {
    Self {
      queue_capacity: 10,
      reader: ReaderOptions::default(),
      tags: EventTags::default(),
    }
  }
}

/// Parameters common to one ranking run
#[derive(Debug, Clone)]
pub struct PipelineRequest {
  /// Number of entries to keep (K)
  pub count: usize,
  pub options: PipelineOptions,
  /// Cancelling this stops the run with [`PipelineError::Cancelled`]
  pub cancel: CancellationToken,
}

impl PipelineRequest {
  pub fn new(count: usize) -> Self {
    Self {
      count,
      options: PipelineOptions::default(),
      cancel: CancellationToken::new(),
    }
  }

  pub fn with_options(mut self, options: PipelineOptions) -> Self {
    self.options = options;
    self
  }

  pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
    self.cancel = cancel;
    self
  }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
  #[error(transparent)]
  Stream(#[from] StreamError),
  #[error("pipeline was cancelled")]
  Cancelled,
  #[error("aggregator finished without producing a result")]
  MissingResult,
  #[error(transparent)]
  TaskPanicked(#[from] TaskPanicked),
}

/// Receiving end of one input file's queue.
///
/// Every read also watches the group token, so an aggregator stops as soon
/// as any reader fails instead of waiting for its own queue to close.
pub struct LineSource {
  name: &'static str,
  rx: mpsc::Receiver<String>,
  cancel: CancellationToken,
  received: usize,
}

impl LineSource {
  /// Next record, or `None` once the reader has closed the queue
  pub async fn next_line(&mut self) -> Result<Option<String>, PipelineError> {
    let line = tokio::select! {
      biased;
      _ = self.cancel.cancelled() => {
        debug!(source = self.name, received = self.received, "Source cancelled");
        return Err(PipelineError::Cancelled);
      }
      line = self.rx.recv() => line,
    };

    match line {
      Some(_) => self.received += 1,
      None => trace!(source = self.name, received = self.received, "Source drained"),
    }
    Ok(line)
  }

  pub fn received(&self) -> usize {
    self.received
  }
}

/// One pipeline invocation: the task group plus the readers spawned into it.
struct Pipeline {
  name: &'static str,
  group: TaskGroup<PipelineError>,
  options: PipelineOptions,
  started: Instant,
}

impl Pipeline {
  fn new(name: &'static str, request: &PipelineRequest) -> Self {
    debug!(pipeline = name, count = request.count, "Pipeline starting");
    Self {
      name,
      group: TaskGroup::new(&request.cancel),
      options: request.options.clone(),
      started: Instant::now(),
    }
  }

  /// Spawn a reader for `path` and return the queue it fills
  fn source(&mut self, name: &'static str, path: PathBuf) -> LineSource {
    // tokio panics on a zero-capacity channel
    let (tx, rx) = mpsc::channel(self.options.queue_capacity.max(1));
    let cancel = self.group.token();
    let reader_cancel = cancel.clone();
    let reader_options = self.options.reader;

    self.group.spawn(
      name,
      async move {
        read_lines(path, tx, reader_options, reader_cancel).await?;
        Ok(())
      },
      log_interrupt(name),
    );

    LineSource {
      name,
      rx,
      cancel,
      received: 0,
    }
  }

  /// Run `aggregator` alongside the readers and wait for the whole group.
  ///
  /// A result is only returned if every task succeeded.
  async fn finish<F>(mut self, aggregator: F) -> Result<Vec<RankedEntry>, PipelineError>
  where
    F: Future<Output = Result<Vec<RankedEntry>, PipelineError>> + Send + 'static,
  {
    let (result_tx, result_rx) = oneshot::channel();
    debug!(pipeline = self.name, readers = self.group.len(), "Pipeline streaming");
    self.group.spawn(
      "aggregator",
      async move {
        let ranked = aggregator.await?;
        let _ = result_tx.send(ranked);
        Ok(())
      },
      log_interrupt("aggregator"),
    );

    self.group.run().await?;
    let ranked = result_rx.await.map_err(|_| PipelineError::MissingResult)?;

    debug!(
      pipeline = self.name,
      entries = ranked.len(),
      elapsed = ?self.started.elapsed(),
      "Pipeline complete"
    );
    Ok(ranked)
  }
}

/// Increment `key`, allocating only the first time it is seen
fn bump(counts: &mut HashMap<String, u64>, key: &str) {
  match counts.get_mut(key) {
    Some(count) => *count += 1,
    None => {
      counts.insert(key.to_string(), 1);
    }
  }
}

/// Push every `(key, count)` pair through a ranking of size `count`
fn rank_all(counts: HashMap<String, u64>, count: usize) -> Vec<RankedEntry> {
  let mut ranking = BoundedRanking::new(count);
  for (key, value) in counts {
    ranking.insert(key, value);
  }
  ranking.drain()
}
