//! Logging setup for CLI commands

use tracing_subscriber::EnvFilter;

/// Parse log level from config string
fn parse_log_level(level: &str) -> Option<tracing::Level> {
  match level.to_lowercase().as_str() {
    "off" => None,
    "error" => Some(tracing::Level::ERROR),
    "warn" => Some(tracing::Level::WARN),
    "info" => Some(tracing::Level::INFO),
    "debug" => Some(tracing::Level::DEBUG),
    "trace" => Some(tracing::Level::TRACE),
    _ => Some(tracing::Level::INFO),
  }
}

/// Initialize console logging on stderr so command output on stdout stays
/// machine-readable. `RUST_LOG` overrides the configured level.
pub fn init_cli_logging(level: &str) {
  let directive = match parse_log_level(level) {
    Some(level) => tracing_subscriber::filter::LevelFilter::from_level(level),
    None => tracing_subscriber::filter::LevelFilter::OFF,
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(directive.into())
    .from_env_lossy();

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}
