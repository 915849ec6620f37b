//! Append-only, capped session ledger.
//!
//! Storage order is most-recent-first (the display order); the cap drops
//! the oldest entries silently. Export paths use [`SessionLog::chronological`]
//! to read oldest-first without disturbing storage order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum retained entries.
pub const LOG_CAPACITY: usize = 100;

/// Category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Session,
    Mode,
    Action,
    Engagement,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub kind: LogKind,
    pub message: String,
}

/// The session ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    /// Prepend an entry, then truncate to [`LOG_CAPACITY`].
    pub fn append(&mut self, kind: LogKind, message: impl Into<String>, at: DateTime<Utc>) {
        self.entries.insert(
            0,
            LogEntry {
                at,
                kind,
                message: message.into(),
            },
        );
        self.entries.truncate(LOG_CAPACITY);
    }

    /// Entries most-recent-first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries oldest-first. Clones; storage order is untouched.
    pub fn chronological(&self) -> Vec<LogEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn newest_entry_is_first() {
        let mut log = SessionLog::default();
        log.append(LogKind::Session, "first", at(0));
        log.append(LogKind::Note, "second", at(1));
        assert_eq!(log.entries()[0].message, "second");
        assert_eq!(log.entries()[1].message, "first");
    }

    #[test]
    fn cap_keeps_the_most_recent_hundred() {
        let mut log = SessionLog::default();
        for i in 0..150 {
            log.append(LogKind::Action, format!("entry {i}"), at(i));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.entries()[0].message, "entry 149");
        assert_eq!(log.entries()[99].message, "entry 50");
    }

    #[test]
    fn chronological_is_oldest_first_and_nondestructive() {
        let mut log = SessionLog::default();
        log.append(LogKind::Mode, "a", at(0));
        log.append(LogKind::Mode, "b", at(1));
        let chrono_order = log.chronological();
        assert_eq!(chrono_order[0].message, "a");
        assert_eq!(chrono_order[1].message, "b");
        assert_eq!(log.entries()[0].message, "b");
    }

    #[test]
    fn clear_empties_the_ledger() {
        let mut log = SessionLog::default();
        log.append(LogKind::Note, "x", at(0));
        log.clear();
        assert!(log.is_empty());
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(count in 0usize..400) {
            let mut log = SessionLog::default();
            for i in 0..count {
                log.append(LogKind::Note, format!("n{i}"), at(i as i64));
            }
            prop_assert!(log.len() <= LOG_CAPACITY);
            prop_assert_eq!(log.len(), count.min(LOG_CAPACITY));
        }
    }
}
