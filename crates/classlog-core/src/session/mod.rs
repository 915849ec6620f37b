//! Observation session engine.
//!
//! The engine is a caller-driven state machine. It owns no threads -- the
//! caller invokes `tick()` once per second for mode accumulation and
//! `poll_reminder()` on a slower cadence for the idle-engagement check.
//! The [`runtime`] module hosts the engine behind real recurring timers
//! when a session runs in-process; the CLI instead persists the engine
//! between invocations and calls [`ObserverSession::catch_up`] on load.
//!
//! ## Command semantics
//!
//! Commands return `Option<Event>`; `None` means the call was a silent
//! no-op (session inactive, or an unknown catalog id). No state changes
//! and no log entries are produced on the `None` path.

pub mod actions;
pub mod engagement;
pub mod log;
pub mod modes;
pub mod runtime;
pub mod snapshot;

pub use actions::{ActionCounter, ActionCounterSet};
pub use engagement::{EngagementLevel, EngagementTracker, REMINDER_THRESHOLD_SECS};
pub use log::{LogEntry, LogKind, SessionLog, LOG_CAPACITY};
pub use modes::{ModeTimer, ModeTimerSet};
pub use runtime::{Clock, SessionTimers, REMINDER_POLL_SECS};
pub use snapshot::{format_hms, ActionTotal, ModeTotal, SessionSnapshot};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Event;

/// One entry of the mode or action catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The reference catalog of four teaching modes.
    pub fn default_modes() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("lecture", "Lecturing"),
            CatalogEntry::new("group", "Group work"),
            CatalogEntry::new("individual", "Individual work"),
            CatalogEntry::new("discussion", "Class discussion"),
        ]
    }

    /// The reference catalog of four teaching actions.
    pub fn default_actions() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("question", "Question posed"),
            CatalogEntry::new("praise", "Praise given"),
            CatalogEntry::new("redirect", "Redirection"),
            CatalogEntry::new("check", "Comprehension check"),
        ]
    }
}

/// Displayable state summary, serialized for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub active: bool,
    pub subject: String,
    pub elapsed_secs: u64,
    pub modes: Vec<ModeTimer>,
    pub actions: Vec<ActionCounter>,
    pub engagement_score: u8,
    pub engagement_level: EngagementLevel,
    pub reminder_due: bool,
    pub log_entries: usize,
    pub at: DateTime<Utc>,
}

/// Core observation session state machine.
///
/// Round-trips through serde so the CLI can persist it between
/// invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverSession {
    id: Uuid,
    subject: String,
    active: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    /// Last instant mode accumulation ran. Lets a reloaded engine catch
    /// up whole elapsed seconds.
    #[serde(default)]
    last_tick_at: Option<DateTime<Utc>>,
    reminder_threshold_secs: u64,
    modes: ModeTimerSet,
    actions: ActionCounterSet,
    engagement: EngagementTracker,
    log: SessionLog,
}

impl Default for ObserverSession {
    fn default() -> Self {
        Self::new(
            &CatalogEntry::default_modes(),
            &CatalogEntry::default_actions(),
            REMINDER_THRESHOLD_SECS,
        )
    }
}

impl ObserverSession {
    pub fn new(
        modes: &[CatalogEntry],
        actions: &[CatalogEntry],
        reminder_threshold_secs: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: String::new(),
            active: false,
            started_at: None,
            ended_at: None,
            last_tick_at: None,
            reminder_threshold_secs,
            modes: ModeTimerSet::from_catalog(modes),
            actions: ActionCounterSet::from_catalog(actions),
            engagement: EngagementTracker::default(),
            log: SessionLog::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn modes(&self) -> &ModeTimerSet {
        &self.modes
    }

    pub fn actions(&self) -> &ActionCounterSet {
        &self.actions
    }

    pub fn engagement(&self) -> &EngagementTracker {
        &self.engagement
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Build a full state summary.
    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        let elapsed_secs = match (self.started_at, self.active) {
            (Some(start), true) => (now - start).num_seconds().max(0) as u64,
            (Some(start), false) => self
                .ended_at
                .map(|end| (end - start).num_seconds().max(0) as u64)
                .unwrap_or(0),
            _ => 0,
        };
        SessionStatus {
            active: self.active,
            subject: self.subject.clone(),
            elapsed_secs,
            modes: self.modes.iter().cloned().collect(),
            actions: self.actions.iter().cloned().collect(),
            engagement_score: self.engagement.score(),
            engagement_level: self.engagement.level(),
            reminder_due: self.engagement.reminder_due(),
            log_entries: self.log.len(),
            at: now,
        }
    }

    /// Materialize the session. Owns all of its data; the log comes out
    /// chronological.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            subject: self.subject.clone(),
            started_at: self.started_at,
            ended_at: self.ended_at,
            modes: self
                .modes
                .iter()
                .map(|t| ModeTotal {
                    name: t.name.clone(),
                    total_secs: t.elapsed_secs,
                })
                .collect(),
            actions: self
                .actions
                .iter()
                .map(|c| ActionTotal {
                    name: c.name.clone(),
                    count: c.count,
                })
                .collect(),
            log: self.log.chronological(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session, resetting timers, counters, engagement and
    /// the ledger. A running session is discarded and restarted.
    pub fn start(&mut self, subject: &str, now: DateTime<Utc>) -> Event {
        self.id = Uuid::new_v4();
        self.subject = subject.to_string();
        self.active = true;
        self.started_at = Some(now);
        self.ended_at = None;
        self.last_tick_at = Some(now);
        self.modes.reset();
        self.actions.reset();
        self.engagement.reset();
        self.log.clear();
        self.log.append(
            LogKind::Session,
            format!("Observation of {subject} started"),
            now,
        );
        Event::SessionStarted {
            session_id: self.id,
            subject: self.subject.clone(),
            at: now,
        }
    }

    /// Freeze the session. Further commands become no-ops until the next
    /// start.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.ended_at = Some(now);
        self.last_tick_at = None;
        self.engagement.suppress_reminder();
        self.log.append(LogKind::Session, "Observation stopped", now);
        let duration_secs = self
            .started_at
            .map(|start| (now - start).num_seconds().max(0) as u64)
            .unwrap_or(0);
        Some(Event::SessionStopped {
            session_id: self.id,
            subject: self.subject.clone(),
            duration_secs,
            at: now,
        })
    }

    /// Flip a mode timer.
    pub fn toggle_mode(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        if !self.active {
            return None;
        }
        let timer = self.modes.toggle(id)?;
        let (name, mode_active, elapsed_secs) =
            (timer.name.clone(), timer.active, timer.elapsed_secs);
        self.log.append(
            LogKind::Mode,
            format!(
                "{name} {}",
                if mode_active { "started" } else { "stopped" }
            ),
            now,
        );
        Some(Event::ModeToggled {
            id: id.to_string(),
            name,
            active: mode_active,
            elapsed_secs,
            at: now,
        })
    }

    /// Tally one observed action.
    pub fn record_action(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        if !self.active {
            return None;
        }
        let counter = self.actions.increment(id)?;
        let (name, count) = (counter.name.clone(), counter.count);
        self.log
            .append(LogKind::Action, format!("{name} (total {count})"), now);
        Some(Event::ActionRecorded {
            id: id.to_string(),
            name,
            count,
            at: now,
        })
    }

    /// Record an engagement score, recomputing the level in the same
    /// transaction and clearing any pending reminder.
    pub fn set_engagement(&mut self, score: u8, now: DateTime<Utc>) -> Option<Event> {
        if !self.active {
            return None;
        }
        let (score, level) = self.engagement.set_score(score, now);
        self.log.append(
            LogKind::Engagement,
            format!("Engagement rated {score} ({level})"),
            now,
        );
        Some(Event::EngagementScored { score, level, at: now })
    }

    /// Record a qualitative note.
    pub fn add_note(&mut self, text: &str, now: DateTime<Utc>) -> Option<Event> {
        if !self.active {
            return None;
        }
        self.log.append(LogKind::Note, text, now);
        Some(Event::NoteAdded {
            text: text.to_string(),
            at: now,
        })
    }

    /// One accumulation step: every active mode timer gains one second.
    /// No-op while inactive, so a stale timer firing after stop is
    /// harmless.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.active {
            return;
        }
        self.modes.tick();
        self.last_tick_at = Some(now);
    }

    /// Apply the whole seconds elapsed since the last tick, then
    /// re-evaluate the reminder. Used when the engine is reloaded from
    /// storage rather than driven live.
    pub fn catch_up(&mut self, now: DateTime<Utc>) {
        if !self.active {
            return;
        }
        match self.last_tick_at {
            Some(last) => {
                let elapsed = (now - last).num_seconds();
                if elapsed > 0 {
                    self.modes.tick_many(elapsed as u64);
                    self.last_tick_at = Some(last + Duration::seconds(elapsed));
                }
            }
            None => self.last_tick_at = Some(now),
        }
        self.poll_reminder(now);
    }

    /// Re-evaluate the idle-engagement reminder. While inactive the flag
    /// is forced down and stays down.
    pub fn poll_reminder(&mut self, now: DateTime<Utc>) -> bool {
        if !self.active {
            self.engagement.suppress_reminder();
            return false;
        }
        self.engagement
            .evaluate_reminder(now, self.started_at, self.reminder_threshold_secs)
    }
}
