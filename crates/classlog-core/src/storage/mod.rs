//! Persistence: TOML configuration and SQLite observation storage.

pub mod config;
pub mod database;

pub use config::{Config, ReminderConfig, ReportConfig, SessionConfig};
pub use database::{Database, ObservationRecord, Totals};

use std::path::PathBuf;

/// Returns `~/.config/classlog[-dev]/` based on CLASSLOG_ENV.
///
/// Set CLASSLOG_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CLASSLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("classlog-dev")
    } else {
        base_dir.join("classlog")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
