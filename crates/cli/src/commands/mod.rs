//! CLI command implementations

mod repository;
mod user;

use anyhow::Result;
use gitrank::{PipelineRequest, RankedEntry, config::Config};
use tracing::{debug, warn};

pub use repository::{cmd_topk_by_commits, cmd_topk_by_events};
pub use user::cmd_topk_by_pc;

use crate::format::{render_json, render_table};

/// Build a request from config, letting `--count` override the default.
///
/// The request is cancelled on Ctrl-C so readers stop promptly.
fn build_request(config: &Config, count: Option<usize>) -> PipelineRequest {
  let request = PipelineRequest::new(count.unwrap_or(config.pipeline.count)).with_options(config.pipeline_options());

  let cancel = request.cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("Interrupted, stopping");
      cancel.cancel();
    }
  });

  request
}

/// Print the ranking as JSON or as a table
fn print_ranking(entries: &[RankedEntry], json: bool, headers: [&str; 2]) -> Result<()> {
  if json {
    println!("{}", render_json(entries)?);
  } else {
    print!("{}", render_table(entries, headers));
  }
  debug!(entries = entries.len(), "Printed ranking");
  Ok(())
}
