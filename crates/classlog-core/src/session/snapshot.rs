//! Immutable session materialization and plain-text export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::log::LogEntry;

/// Accumulated time for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTotal {
    pub name: String,
    pub total_secs: u64,
}

/// Final tally for one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTotal {
    pub name: String,
    pub count: u64,
}

/// A fully materialized view of a session, owning all of its data.
///
/// Snapshots cross into export, archival and report generation; they hold
/// no references back to the live engine. The log is chronological
/// (oldest first), unlike the engine's display-ordered ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub subject: String,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub modes: Vec<ModeTotal>,
    pub actions: Vec<ActionTotal>,
    pub log: Vec<LogEntry>,
}

impl SessionSnapshot {
    /// Deterministic plain-text rendering consumed by export and embedded
    /// in the report prompt.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Subject: {}\n", self.subject));
        out.push_str(&format!("Start: {}\n", render_instant(self.started_at)));
        out.push_str(&format!("End: {}\n", render_instant(self.ended_at)));

        out.push_str("\nTeaching modes:\n");
        for mode in &self.modes {
            out.push_str(&format!(
                "  {}: {}\n",
                mode.name,
                format_hms(mode.total_secs)
            ));
        }

        out.push_str("\nTeaching actions:\n");
        for action in &self.actions {
            out.push_str(&format!("  {}: {}\n", action.name, action.count));
        }

        out.push_str("\nLog:\n");
        for entry in &self.log {
            out.push_str(&format!(
                "  [{}] {}\n",
                entry.at.format("%H:%M:%S"),
                entry.message
            ));
        }
        out
    }
}

fn render_instant(instant: Option<DateTime<Utc>>) -> String {
    match instant {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "(in progress)".to_string(),
    }
}

/// Render a duration in seconds as `HH:MM:SS`.
pub fn format_hms(total_secs: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}
