//! Top-K repositories by events of one type (watch events by default).

use std::{collections::HashMap, path::PathBuf};

use tracing::{debug, trace};

use super::{LineSource, Pipeline, PipelineError, PipelineRequest, bump};
use crate::{
  ranking::{BoundedRanking, RankedEntry},
  record::{EventRecord, RepoRecord},
};

#[derive(Debug, Clone)]
pub struct EventInputs {
  pub events: PathBuf,
  pub repos: PathBuf,
}

/// Rank repositories by how many `event_type` events reference them.
///
/// Events are tallied per repo id, then the repos file maps ids to names.
/// Ids that never appear in the repos file are dropped.
pub async fn top_repos_by_events(
  request: &PipelineRequest,
  event_type: &str,
  inputs: EventInputs,
) -> Result<Vec<RankedEntry>, PipelineError> {
  let mut pipeline = Pipeline::new("topk-by-events", request);
  let events = pipeline.source("events", inputs.events);
  let repos = pipeline.source("repos", inputs.repos);

  pipeline
    .finish(aggregate(events, repos, event_type.to_string(), request.count))
    .await
}

async fn aggregate(
  mut events: LineSource,
  mut repos: LineSource,
  event_type: String,
  count: usize,
) -> Result<Vec<RankedEntry>, PipelineError> {
  let mut tallies: HashMap<String, u64> = HashMap::new();

  while let Some(line) = events.next_line().await? {
    let Some(event) = EventRecord::parse(&line) else {
      debug!("Missing {} columns in event record [{}]", EventRecord::FIELDS, line);
      continue;
    };
    if event.kind != event_type {
      continue;
    }
    bump(&mut tallies, event.repo_id);
  }
  trace!(
    events = events.received(),
    repos = tallies.len(),
    event_type = %event_type,
    "Events tallied"
  );

  let mut ranking = BoundedRanking::new(count);
  while !tallies.is_empty() {
    let Some(line) = repos.next_line().await? else {
      break;
    };
    let Some(repo) = RepoRecord::parse(&line) else {
      debug!("Missing {} columns in repo record [{}]", RepoRecord::FIELDS, line);
      continue;
    };
    // Removing the id means a duplicate repo row is not ranked twice
    if let Some(tally) = tallies.remove(repo.id)
      && tally > 0
    {
      ranking.insert(repo.name, tally);
    }
  }

  if !tallies.is_empty() {
    debug!(unresolved = tallies.len(), "Dropping counts for unknown repositories");
  }

  Ok(ranking.drain())
}
