//! Logging setup for CLI commands

use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Parse log level from config string
fn parse_log_level(level: &str) -> LevelFilter {
  match level.to_lowercase().as_str() {
    "off" => LevelFilter::OFF,
    "error" => LevelFilter::ERROR,
    "warn" => LevelFilter::WARN,
    "info" => LevelFilter::INFO,
    "debug" => LevelFilter::DEBUG,
    "trace" => LevelFilter::TRACE,
    _ => LevelFilter::INFO,
  }
}

/// Initialize console logging.
///
/// `--debug` wins over the configured level; `RUST_LOG` can still add
/// per-target directives on top.
pub fn init_cli_logging(debug: bool, configured_level: &str) {
  let level = if debug {
    LevelFilter::DEBUG
  } else {
    parse_log_level(configured_level)
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  if debug {
    tracing::debug!("Setting the log level to debug");
  }
}
