use crate::config::LogConfig;
use crate::error::AppError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "rowdeck=info";

/// Installs a file-backed subscriber. The terminal belongs to the
/// interface, so without a log file nothing is installed.
pub fn init(config: &LogConfig) -> Result<bool, AppError> {
    let Some(path) = config.file.as_deref() else {
        return Ok(false);
    };
    install(path, config.filter.as_deref())?;
    tracing::info!(path = %path.display(), "logging started");
    Ok(true)
}

fn install(path: &Path, filter: Option<&str>) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Logging(format!("{}: {e}", path.display())))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER))
            .map_err(|e| AppError::Logging(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
