//! Teaching-action counters.

use serde::{Deserialize, Serialize};

use super::CatalogEntry;

/// A named tally incremented by discrete observed events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounter {
    pub id: String,
    pub name: String,
    pub count: u64,
}

/// Ordered collection of action counters for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionCounterSet {
    counters: Vec<ActionCounter>,
}

impl ActionCounterSet {
    pub fn from_catalog(entries: &[CatalogEntry]) -> Self {
        Self {
            counters: entries
                .iter()
                .map(|e| ActionCounter {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Increment the counter with `id`. Returns the counter after the
    /// increment, or `None` for an unknown id.
    pub fn increment(&mut self, id: &str) -> Option<&ActionCounter> {
        let counter = self.counters.iter_mut().find(|c| c.id == id)?;
        counter.count += 1;
        Some(counter)
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        for counter in &mut self.counters {
            counter.count = 0;
        }
    }

    pub fn get(&self, id: &str) -> Option<&ActionCounter> {
        self.counters.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionCounter> {
        self.counters.iter()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
