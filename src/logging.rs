// src/logging.rs

//! Subscriber setup for the `dayplan` binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level`
//! 2. `DAYPLAN_LOG`, which takes full `EnvFilter` directives
//!    (e.g. `dayplan::placement=trace,info`)
//! 3. `info`
//!
//! Output goes to stderr; stdout carries only the schedule. The library
//! itself never installs a subscriber, embedding code brings its own.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "DAYPLAN_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global stderr subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = resolve_directive(cli_level, env_value.as_deref());

    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{directive}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Pick the filter directive string. Unparseable env values fall back to the
/// default rather than aborting startup.
pub fn resolve_directive(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_directive(level).to_string();
    }
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() && EnvFilter::try_new(value).is_ok() => value.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
