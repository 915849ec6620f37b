//! Concurrent teaching-mode timers.
//!
//! Mode timers are not mutually exclusive: any number may be active at
//! once, and each active timer gains one second per tick.

use serde::{Deserialize, Serialize};

use super::CatalogEntry;

/// A named stopwatch that accumulates time while toggled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTimer {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub elapsed_secs: u64,
}

/// Ordered collection of mode timers for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeTimerSet {
    timers: Vec<ModeTimer>,
}

impl ModeTimerSet {
    pub fn from_catalog(entries: &[CatalogEntry]) -> Self {
        Self {
            timers: entries
                .iter()
                .map(|e| ModeTimer {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    active: false,
                    elapsed_secs: 0,
                })
                .collect(),
        }
    }

    /// Flip the timer with `id`. Returns the timer after the flip, or
    /// `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<&ModeTimer> {
        let timer = self.timers.iter_mut().find(|t| t.id == id)?;
        timer.active = !timer.active;
        Some(timer)
    }

    /// Advance every active timer by one second.
    pub fn tick(&mut self) {
        for timer in self.timers.iter_mut().filter(|t| t.active) {
            timer.elapsed_secs += 1;
        }
    }

    /// Advance every active timer by `secs` seconds.
    pub fn tick_many(&mut self, secs: u64) {
        for timer in self.timers.iter_mut().filter(|t| t.active) {
            timer.elapsed_secs += secs;
        }
    }

    /// Deactivate and zero every timer.
    pub fn reset(&mut self) {
        for timer in &mut self.timers {
            timer.active = false;
            timer.elapsed_secs = 0;
        }
    }

    pub fn get(&self, id: &str) -> Option<&ModeTimer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModeTimer> {
        self.timers.iter()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
