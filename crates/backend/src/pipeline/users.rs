//! Top-K active users by PRs created and commits pushed.

use std::{collections::HashMap, path::PathBuf};

use tracing::{debug, trace};

use super::{LineSource, Pipeline, PipelineError, PipelineRequest};
use crate::{
  ranking::{BoundedRanking, RankedEntry},
  record::{ActorRecord, EventRecord, commit_event_id},
};

#[derive(Debug, Clone)]
pub struct UserInputs {
  pub events: PathBuf,
  pub commits: PathBuf,
  pub actors: PathBuf,
}

/// Rank actors by the commits attached to their push and create events.
///
/// Only actors with a non-zero count and a known username are ranked. Actors
/// missing from the actors file are dropped.
pub async fn top_users_by_commits(
  request: &PipelineRequest,
  inputs: UserInputs,
) -> Result<Vec<RankedEntry>, PipelineError> {
  let mut pipeline = Pipeline::new("topk-by-pc", request);
  let events = pipeline.source("events", inputs.events);
  let commits = pipeline.source("commits", inputs.commits);
  let actors = pipeline.source("actors", inputs.actors);

  let tags = [request.options.tags.push.clone(), request.options.tags.create.clone()];
  pipeline
    .finish(aggregate(events, commits, actors, tags, request.count))
    .await
}

async fn aggregate(
  mut events: LineSource,
  mut commits: LineSource,
  mut actors: LineSource,
  tags: [String; 2],
  count: usize,
) -> Result<Vec<RankedEntry>, PipelineError> {
  let mut event_to_actor: HashMap<String, String> = HashMap::new();
  let mut actor_counts: HashMap<String, u64> = HashMap::new();

  while let Some(line) = events.next_line().await? {
    let Some(event) = EventRecord::parse(&line) else {
      debug!("Missing {} columns in event record [{}]", EventRecord::FIELDS, line);
      continue;
    };
    if !tags.iter().any(|tag| tag == event.kind) {
      continue;
    }
    event_to_actor.insert(event.id.to_string(), event.actor_id.to_string());
    if !actor_counts.contains_key(event.actor_id) {
      actor_counts.insert(event.actor_id.to_string(), 0);
    }
  }
  trace!(events = event_to_actor.len(), actors = actor_counts.len(), "Events indexed");

  while let Some(line) = commits.next_line().await? {
    let event_id = commit_event_id(&line);
    if let Some(actor_id) = event_to_actor.get(event_id)
      && let Some(count) = actor_counts.get_mut(actor_id)
    {
      *count += 1;
    }
  }
  drop(event_to_actor);

  // Zero counts are never ranked, so they need no name either
  actor_counts.retain(|_, count| *count > 0);
  trace!(commits = commits.received(), actors = actor_counts.len(), "Commits joined");

  let mut ranking = BoundedRanking::new(count);
  while !actor_counts.is_empty() {
    let Some(line) = actors.next_line().await? else {
      break;
    };
    let Some(actor) = ActorRecord::parse(&line) else {
      debug!("Missing {} columns in actor record [{}]", ActorRecord::FIELDS, line);
      continue;
    };
    if let Some(count) = actor_counts.remove(actor.id) {
      ranking.insert(actor.username, count);
    }
  }

  if !actor_counts.is_empty() {
    debug!(unresolved = actor_counts.len(), "Dropping counts for unknown actors");
  }

  Ok(ranking.drain())
}
