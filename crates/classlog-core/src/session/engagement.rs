//! Engagement score tracking and the idle-score reminder.
//!
//! The score is a 0-100 observer-entered proxy for student attentiveness,
//! bucketed into three levels. The level is recomputed in the same call
//! that changes the score, so no stale level is ever observable.
//!
//! The reminder is a derived flag, re-evaluated on a slow poll: if no
//! score has been entered for longer than the threshold (counted from the
//! last update, or from session start before the first update), the flag
//! goes up. Entering a score clears it immediately.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score assigned at session start.
pub const DEFAULT_SCORE: u8 = 50;

/// Seconds without a score update before the reminder fires.
pub const REMINDER_THRESHOLD_SECS: u64 = 300;

/// Discrete engagement level derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementLevel {
    High,
    Medium,
    Low,
}

impl EngagementLevel {
    /// `> 66` is high, `> 33` is medium, the rest is low.
    pub fn from_score(score: u8) -> Self {
        if score > 66 {
            EngagementLevel::High
        } else if score > 33 {
            EngagementLevel::Medium
        } else {
            EngagementLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EngagementLevel::High => "high",
            EngagementLevel::Medium => "medium",
            EngagementLevel::Low => "low",
        }
    }
}

impl std::fmt::Display for EngagementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Current engagement state for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementTracker {
    score: u8,
    level: EngagementLevel,
    last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    reminder_due: bool,
}

impl Default for EngagementTracker {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            level: EngagementLevel::from_score(DEFAULT_SCORE),
            last_update: None,
            reminder_due: false,
        }
    }
}

impl EngagementTracker {
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn level(&self) -> EngagementLevel {
        self.level
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn reminder_due(&self) -> bool {
        self.reminder_due
    }

    /// Record a score. Values above 100 are clamped. Returns the stored
    /// score and the recomputed level.
    pub fn set_score(&mut self, score: u8, now: DateTime<Utc>) -> (u8, EngagementLevel) {
        let score = score.min(100);
        self.score = score;
        self.level = EngagementLevel::from_score(score);
        self.last_update = Some(now);
        self.reminder_due = false;
        (score, self.level)
    }

    /// Re-evaluate the reminder flag. Idempotent; the only effect is the
    /// flag itself. `session_start` anchors the window before the first
    /// score update.
    pub fn evaluate_reminder(
        &mut self,
        now: DateTime<Utc>,
        session_start: Option<DateTime<Utc>>,
        threshold_secs: u64,
    ) -> bool {
        let reference = self.last_update.or(session_start).unwrap_or(now);
        self.reminder_due = (now - reference).num_seconds() > threshold_secs as i64;
        self.reminder_due
    }

    /// Force the flag down. Used while no session is active.
    pub fn suppress_reminder(&mut self) {
        self.reminder_due = false;
    }

    /// Back to the session-start state.
    pub fn reset(&mut self) {
        *self = Self::default();
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
    fn level_boundaries() {
        assert_eq!(EngagementLevel::from_score(0), EngagementLevel::Low);
        assert_eq!(EngagementLevel::from_score(33), EngagementLevel::Low);
        assert_eq!(EngagementLevel::from_score(34), EngagementLevel::Medium);
        assert_eq!(EngagementLevel::from_score(66), EngagementLevel::Medium);
        assert_eq!(EngagementLevel::from_score(67), EngagementLevel::High);
        assert_eq!(EngagementLevel::from_score(100), EngagementLevel::High);
    }

    #[test]
    fn set_score_recomputes_level_and_clamps() {
        let mut tracker = EngagementTracker::default();
        assert_eq!(tracker.set_score(80, at(0)), (80, EngagementLevel::High));
        assert_eq!(tracker.set_score(10, at(1)), (10, EngagementLevel::Low));
        assert_eq!(tracker.set_score(255, at(2)), (100, EngagementLevel::High));
        assert_eq!(tracker.last_update(), Some(at(2)));
    }

    #[test]
    fn reminder_fires_after_threshold_from_session_start() {
        let mut tracker = EngagementTracker::default();
        let start = Some(at(0));
        assert!(!tracker.evaluate_reminder(at(299), start, REMINDER_THRESHOLD_SECS));
        assert!(tracker.evaluate_reminder(at(301), start, REMINDER_THRESHOLD_SECS));
    }

    #[test]
    fn reminder_window_anchors_on_last_update() {
        let mut tracker = EngagementTracker::default();
        let start = Some(at(0));
        tracker.set_score(70, at(200));
        assert!(!tracker.evaluate_reminder(at(400), start, REMINDER_THRESHOLD_SECS));
        assert!(tracker.evaluate_reminder(at(501), start, REMINDER_THRESHOLD_SECS));
    }

    #[test]
    fn set_score_clears_reminder_immediately() {
        let mut tracker = EngagementTracker::default();
        tracker.evaluate_reminder(at(301), Some(at(0)), REMINDER_THRESHOLD_SECS);
        assert!(tracker.reminder_due());
        tracker.set_score(55, at(302));
        assert!(!tracker.reminder_due());
    }

    #[test]
    fn evaluate_is_idempotent() {
        let mut tracker = EngagementTracker::default();
        let start = Some(at(0));
        let first = tracker.evaluate_reminder(at(301), start, REMINDER_THRESHOLD_SECS);
        let second = tracker.evaluate_reminder(at(301), start, REMINDER_THRESHOLD_SECS);
        assert_eq!(first, second);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut tracker = EngagementTracker::default();
        tracker.set_score(90, at(10));
        tracker.reset();
        assert_eq!(tracker.score(), DEFAULT_SCORE);
        assert_eq!(tracker.level(), EngagementLevel::Medium);
        assert_eq!(tracker.last_update(), None);
        assert!(!tracker.reminder_due());
    }

    proptest! {
        #[test]
        fn level_is_a_pure_function_of_score(score in 0u8..=100) {
            let expected = if score > 66 {
                EngagementLevel::High
            } else if score > 33 {
                EngagementLevel::Medium
            } else {
                EngagementLevel::Low
            };
            let mut tracker = EngagementTracker::default();
            let (stored, level) = tracker.set_score(score, at(0));
            prop_assert_eq!(stored, score);
            prop_assert_eq!(level, expected);
        }
    }
}
