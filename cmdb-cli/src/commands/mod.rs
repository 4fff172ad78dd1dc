//! CLI command implementations

pub mod auth;
pub mod categories;
pub mod cis;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logs;
pub mod open;
pub mod reports;
pub mod settings;
pub mod status;
pub mod users;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cmdb_core::config::Config;
use cmdb_core::services::Navigation;
use cmdb_core::{CmdbContext, EntryPoint, LogEvent, LoggingService, Route};

/// Get the data directory from `CMDB_DIR` or default to `~/.cmdb`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CMDB_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".cmdb"))
}

/// Open the console context
///
/// Each invocation is one "process start": the context hydrates identity
/// and session from the store exactly once here.
pub fn get_context() -> Result<CmdbContext> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    CmdbContext::new(&data_dir).context("Failed to initialize console context")
}

/// Get the event logger
///
/// Returns None if logging is disabled or fails to initialize; logging
/// never blocks a command.
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    let config = Config::load(&data_dir).unwrap_or_default();
    if !config.event_log {
        return None;
    }
    match LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")) {
        Ok(logger) => Some(logger),
        Err(e) => {
            tracing::debug!(error = %e, "Event log unavailable");
            None
        }
    }
}

/// Record an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        if let Err(e) = l.log(event) {
            tracing::debug!(error = %e, "Failed to record event");
        }
    }
}

/// Record a failed operation with its error kind
pub fn log_failure(logger: &Option<LoggingService>, event: LogEvent, err: &cmdb_core::Error) {
    log_event(logger, event.with_error(err.to_string()).with_error_details(err.kind()));
}

/// Fail unless the current session may open `route`
///
/// Commands acting on a protected view go through the same guards as a
/// navigation to that view.
pub fn require_view(ctx: &CmdbContext, route: Route) -> Result<()> {
    match ctx.navigate(route.path()) {
        Navigation::Allow { .. } => Ok(()),
        Navigation::Redirect { to: Route::Register, .. } => {
            bail!("No users are registered yet. Run 'cmdb register <email>' first.")
        }
        Navigation::Redirect { from, .. } => bail!(
            "Sign in to open {}. Run 'cmdb login <email>'.",
            from.as_deref().unwrap_or(route.path())
        ),
    }
}
