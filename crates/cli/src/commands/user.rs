//! User rankings

use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use gitrank::{
  config::Config,
  pipeline::{UserInputs, top_users_by_commits},
};
use tracing::debug;

use super::{build_request, print_ranking};

/// Top K active users sorted by amount of PRs created and commits pushed
pub async fn cmd_topk_by_pc(
  config: &Config,
  actors_file: PathBuf,
  events_file: PathBuf,
  commits_file: PathBuf,
  count: Option<usize>,
  json: bool,
) -> Result<()> {
  let start = Instant::now();
  let request = build_request(config, count);
  let inputs = UserInputs {
    events: events_file,
    commits: commits_file,
    actors: actors_file,
  };

  let ranked = top_users_by_commits(&request, inputs)
    .await
    .context("Failed to rank users by PRs and commits")?;
  print_ranking(&ranked, json, ["User", "Count"])?;

  debug!("[topk-by-pc] took {:?}", start.elapsed());
  Ok(())
}
