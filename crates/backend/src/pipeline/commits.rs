//! Top-K repositories by the amount of commits pushed.

use std::{
  collections::{HashMap, HashSet},
  path::PathBuf,
};

use tracing::{debug, trace, warn};

use super::{LineSource, Pipeline, PipelineError, PipelineRequest, rank_all};
use crate::{
  ranking::RankedEntry,
  record::{EventRecord, RepoRecord, commit_event_id},
};

#[derive(Debug, Clone)]
pub struct CommitInputs {
  pub events: PathBuf,
  pub commits: PathBuf,
  pub repos: PathBuf,
}

/// Rank repositories by the number of commits carried by their push events.
///
/// Every repo with at least one push event is a candidate, even with zero
/// matching commits. Names are resolved only for the ranked entries; an id
/// missing from the repos file is kept as-is.
pub async fn top_repos_by_commits(
  request: &PipelineRequest,
  inputs: CommitInputs,
) -> Result<Vec<RankedEntry>, PipelineError> {
  let mut pipeline = Pipeline::new("topk-by-commits", request);
  let events = pipeline.source("events", inputs.events);
  let commits = pipeline.source("commits", inputs.commits);
  let repos = pipeline.source("repos", inputs.repos);

  let push_tag = request.options.tags.push.clone();
  pipeline
    .finish(aggregate(events, commits, repos, push_tag, request.count))
    .await
}

async fn aggregate(
  mut events: LineSource,
  mut commits: LineSource,
  mut repos: LineSource,
  push_tag: String,
  count: usize,
) -> Result<Vec<RankedEntry>, PipelineError> {
  // push event id -> repo id
  let mut event_to_repo: HashMap<String, String> = HashMap::new();
  let mut commit_counts: HashMap<String, u64> = HashMap::new();

  while let Some(line) = events.next_line().await? {
    let Some(event) = EventRecord::parse(&line) else {
      debug!("Missing {} columns in event record [{}]", EventRecord::FIELDS, line);
      continue;
    };
    if event.kind != push_tag {
      continue;
    }
    event_to_repo.insert(event.id.to_string(), event.repo_id.to_string());
    if !commit_counts.contains_key(event.repo_id) {
      commit_counts.insert(event.repo_id.to_string(), 0);
    }
  }
  trace!(push_events = event_to_repo.len(), repos = commit_counts.len(), "Push events indexed");

  while let Some(line) = commits.next_line().await? {
    let event_id = commit_event_id(&line);
    if let Some(repo_id) = event_to_repo.get(event_id)
      && let Some(count) = commit_counts.get_mut(repo_id)
    {
      *count += 1;
    }
  }
  trace!(commits = commits.received(), "Commits joined");
  drop(event_to_repo);

  let ranked = rank_all(commit_counts, count);
  resolve_names(ranked, &mut repos).await
}

/// Swap repo ids for names, reading the repos file only until every ranked
/// id has been seen.
async fn resolve_names(ranked: Vec<RankedEntry>, repos: &mut LineSource) -> Result<Vec<RankedEntry>, PipelineError> {
  let mut pending: HashSet<&str> = ranked.iter().map(|entry| entry.key.as_str()).collect();
  let mut names: HashMap<String, String> = HashMap::with_capacity(pending.len());

  while !pending.is_empty() {
    let Some(line) = repos.next_line().await? else {
      break;
    };
    let Some(repo) = RepoRecord::parse(&line) else {
      debug!("Missing {} columns in repo record [{}]", RepoRecord::FIELDS, line);
      continue;
    };
    if pending.remove(repo.id) {
      names.insert(repo.id.to_string(), repo.name.to_string());
    }
  }
  drop(pending);

  Ok(
    ranked
      .into_iter()
      .map(|mut entry| {
        match names.remove(&entry.key) {
          Some(name) => entry.key = name,
          None => warn!(repo_id = %entry.key, "Couldn't find the repo name, keeping id"),
        }
        entry
      })
      .collect(),
  )
}
