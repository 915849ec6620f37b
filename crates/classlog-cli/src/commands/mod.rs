pub mod action;
pub mod auth;
pub mod config;
pub mod engage;
pub mod mode;
pub mod note;
pub mod report;
pub mod session;

use std::sync::Arc;

use chrono::Utc;
use classlog_core::{Config, Database, KeyringCredentialStore, ObserverSession, ReportClient};

const SESSION_KEY: &str = "observer_session";

/// Load the persisted session engine, catching up wall-clock seconds
/// elapsed since the last invocation. Falls back to a fresh engine built
/// from the configured catalogs.
pub(crate) fn load_session(db: &Database, config: &Config) -> ObserverSession {
    if let Ok(Some(json)) = db.kv_get(SESSION_KEY) {
        if let Ok(mut session) = serde_json::from_str::<ObserverSession>(&json) {
            session.catch_up(Utc::now());
            return session;
        }
    }
    ObserverSession::new(
        &config.session.modes,
        &config.session.actions,
        config.reminder.threshold_secs,
    )
}

pub(crate) fn save_session(
    db: &Database,
    session: &ObserverSession,
) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(SESSION_KEY, &serde_json::to_string(session)?)?;
    Ok(())
}

pub(crate) fn report_client(config: &Config) -> ReportClient {
    ReportClient::with_endpoint(
        Arc::new(KeyringCredentialStore::new()),
        &config.report.endpoint,
        &config.report.model,
        config.report.max_attempts,
    )
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
