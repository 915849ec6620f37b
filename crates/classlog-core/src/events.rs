use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::EngagementLevel;

/// Every state change in the session engine produces an Event.
/// The CLI prints them; an embedding application could subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        subject: String,
        at: DateTime<Utc>,
    },
    SessionStopped {
        session_id: Uuid,
        subject: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    ModeToggled {
        id: String,
        name: String,
        active: bool,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    ActionRecorded {
        id: String,
        name: String,
        count: u64,
        at: DateTime<Utc>,
    },
    EngagementScored {
        score: u8,
        level: EngagementLevel,
        at: DateTime<Utc>,
    },
    NoteAdded {
        text: String,
        at: DateTime<Utc>,
    },
}
