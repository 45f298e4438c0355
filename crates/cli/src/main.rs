//! gitrank CLI - Top-K analytics over GitHub event dumps

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gitrank::config::Config;
use tracing::{debug, error, warn};

mod commands;
mod format;
mod logging;

use commands::{cmd_topk_by_commits, cmd_topk_by_events, cmd_topk_by_pc};
use logging::init_cli_logging;

#[derive(Parser)]
#[command(name = "gitrank", version)]
#[command(about = "Run analytics on git data set")]
#[command(after_help = "\
EXAMPLES:
  gitrank repository topk-by-events --repos-file repos.csv --events-file events.csv
  gitrank r tc --repos-file repos.csv --events-file events.csv --commits-file commits.csv --count 5
  gitrank user topk-by-pc --actors-file actors.csv --events-file events.csv --commits-file commits.csv --json

CONFIG:
  $GITRANK_CONFIG or ~/.config/gitrank/config.toml")]
struct Cli {
  /// Set the log level to debug
  #[arg(long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Flags shared by every ranking command
#[derive(Args, Debug)]
struct OutputArgs {
  /// Maximum count to show (default: pipeline.count from config, 10)
  #[arg(long, env = "COUNT")]
  count: Option<usize>,
  /// Render the result as json
  #[arg(long, env = "JSON")]
  json: bool,
}

/// Subcommands for `gitrank repository`
#[derive(Subcommand)]
enum RepositoryCommand {
  /// Top K repositories by the amount of commits pushed
  #[command(name = "topk-by-commits", alias = "tc")]
  TopkByCommits {
    /// Path to the repos.csv file
    #[arg(long, env = "REPOS_FILE")]
    repos_file: PathBuf,
    /// Path to the events.csv file
    #[arg(long, env = "EVENTS_FILE")]
    events_file: PathBuf,
    /// Path to the commits.csv file
    #[arg(long, env = "COMMITS_FILE")]
    commits_file: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
  },
  /// Top K repositories sorted by events
  #[command(name = "topk-by-events", alias = "tw")]
  TopkByEvents {
    /// Path to the repos.csv file
    #[arg(long, env = "REPOS_FILE")]
    repos_file: PathBuf,
    /// Path to the events.csv file
    #[arg(long, env = "EVENTS_FILE")]
    events_file: PathBuf,
    /// Event type to analyze (default: events.watch from config, WatchEvent)
    #[arg(long, env = "EVENT_TYPE")]
    event_type: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
  },
}

/// Subcommands for `gitrank user`
#[derive(Subcommand)]
enum UserCommand {
  /// Top K active users sorted by amount of PRs created and commits pushed
  #[command(name = "topk-by-pc", alias = "t")]
  TopkByPc {
    /// Path to the actors.csv file
    #[arg(long, env = "ACTORS_FILE")]
    actors_file: PathBuf,
    /// Path to the events.csv file
    #[arg(long, env = "EVENTS_FILE")]
    events_file: PathBuf,
    /// Path to the commits.csv file
    #[arg(long, env = "COMMITS_FILE")]
    commits_file: PathBuf,
    #[command(flatten)]
    output: OutputArgs,
  },
}

#[derive(Subcommand)]
enum Commands {
  /// Commands related to repository operations
  #[command(alias = "r")]
  Repository {
    #[command(subcommand)]
    command: RepositoryCommand,
  },
  /// Commands related to user operations
  #[command(alias = "u")]
  User {
    #[command(subcommand)]
    command: UserCommand,
  },
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  let (config, config_error) = Config::load();
  init_cli_logging(cli.debug, &config.logging.level);
  if let Some(e) = config_error {
    warn!("{}, using defaults", e);
  }
  debug!(path = ?Config::config_path(), "Configuration resolved");

  if let Err(e) = run(cli.command, &config).await {
    error!("Error in app run: {:#}", e);
    std::process::exit(1);
  }
}

async fn run(command: Commands, config: &Config) -> Result<()> {
  match command {
    Commands::Repository { command } => match command {
      RepositoryCommand::TopkByCommits {
        repos_file,
        events_file,
        commits_file,
        output,
      } => cmd_topk_by_commits(config, repos_file, events_file, commits_file, output.count, output.json).await,
      RepositoryCommand::TopkByEvents {
        repos_file,
        events_file,
        event_type,
        output,
      } => cmd_topk_by_events(config, repos_file, events_file, event_type, output.count, output.json).await,
    },

    Commands::User { command } => match command {
      UserCommand::TopkByPc {
        actors_file,
        events_file,
        commits_file,
        output,
      } => cmd_topk_by_pc(config, actors_file, events_file, commits_file, output.count, output.json).await,
    },
  }
}
