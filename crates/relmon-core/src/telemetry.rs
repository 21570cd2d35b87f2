//! Tracing initialisation for relmon binaries.
//!
//! Call [`init_tracing`] (or [`init_from_config`]) once at program start.
//! Later calls are ignored, since the global subscriber can only be set
//! once per process.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::RelmonConfig;
use crate::domain::error::{RelmonError, Result};

/// Initialise the global tracing subscriber.
///
/// * `json`: emit newline-delimited JSON log lines.
/// * `level`: verbosity when `RUST_LOG` is not set.
///
/// Logs go to stderr; stdout is left to command output.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

/// Parse a level name such as `"debug"` or `"WARN"`.
pub fn parse_level(level: &str) -> Result<Level> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|_| RelmonError::Config(format!("invalid log level: {level}")))
}

/// Initialise tracing from the `log_level` / `log_json` settings.
pub fn init_from_config(config: &RelmonConfig) -> Result<()> {
    let level = parse_level(&config.log_level)?;
    init_tracing(config.log_json, level);
    Ok(())
}
