//! Repository rankings

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use gitrank::{
  config::Config,
  pipeline::{CommitInputs, EventInputs, top_repos_by_commits, top_repos_by_events},
};
use tracing::debug;

use super::{build_request, print_ranking};

/// Top K repositories by the amount of commits pushed
pub async fn cmd_topk_by_commits(
  config: &Config,
  repos_file: PathBuf,
  events_file: PathBuf,
  commits_file: PathBuf,
  count: Option<usize>,
  json: bool,
) -> Result<()> {
  let start = Instant::now();
  let request = build_request(config, count);
  let inputs = CommitInputs {
    events: events_file,
    commits: commits_file,
    repos: repos_file,
  };

  let ranked = top_repos_by_commits(&request, inputs)
    .await
    .context("Failed to rank repositories by commits")?;
  print_ranking(&ranked, json, ["Repository", "Count"])?;

  debug!("[topk-by-commits] took {:?}", start.elapsed());
  Ok(())
}

/// Top K repositories sorted by events of one type
pub async fn cmd_topk_by_events(
  config: &Config,
  repos_file: PathBuf,
  events_file: PathBuf,
  event_type: Option<String>,
  count: Option<usize>,
  json: bool,
) -> Result<()> {
  let start = Instant::now();
  let request = build_request(config, count);
  let event_type = event_type.unwrap_or_else(|| config.events.watch.clone());
  let inputs = EventInputs {
    events: events_file,
    repos: repos_file,
  };

  let ranked = top_repos_by_events(&request, &event_type, inputs)
    .await
    .with_context(|| format!("Failed to rank repositories by {}", event_type))?;
  print_ranking(&ranked, json, ["Repository", "Count"])?;

  debug!("[topk-by-events] took {:?}", start.elapsed());
  Ok(())
}
