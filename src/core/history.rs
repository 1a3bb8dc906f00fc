//! State visit history.
//!
//! History stores state *names*, one entry per committed move plus the
//! initial seed entry. It grows on forward motion and shrinks on rollback,
//! and never drops its seed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a history entry came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryOrigin {
    /// The seed entry written when the machine got its first state
    Initial,
    /// A transition whose guard matched (or that had no guard)
    Guard {
        /// Position of the transition within its source bucket
        index: usize,
    },
    /// A transition picked by the decision fallback
    Fallback {
        /// Position of the transition within its source bucket
        index: usize,
    },
}

/// One visited state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Name of the state that became current
    pub state: String,
    /// When it became current
    pub entered_at: DateTime<Utc>,
    /// What caused the move
    pub origin: EntryOrigin,
}

/// Ordered log of visited states.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{EntryOrigin, StateHistory};
///
/// let mut history = StateHistory::seeded("Welcome");
/// history.record("MainMenu", EntryOrigin::Guard { index: 0 });
///
/// assert_eq!(history.names(), vec!["Welcome", "MainMenu"]);
///
/// let popped = history.rewind();
/// assert_eq!(popped.map(|e| e.state), Some("MainMenu".to_string()));
/// assert_eq!(history.current(), Some("Welcome"));
///
/// // The seed entry is never removed.
/// assert!(history.rewind().is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateHistory {
    entries: Vec<HistoryEntry>,
}

impl StateHistory {
    /// Create an empty history, for a machine that has no state yet.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a history holding only the seed entry.
    pub fn seeded(initial: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.record(initial, EntryOrigin::Initial);
        history
    }

    /// Rebuild from persisted entries.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry for a committed move.
    pub fn record(&mut self, state: impl Into<String>, origin: EntryOrigin) {
        self.entries.push(HistoryEntry {
            state: state.into(),
            entered_at: Utc::now(),
            origin,
        });
    }

    /// Drop the most recent entry if an older one remains beneath it.
    ///
    /// Returns the removed entry, or `None` when only the seed is left.
    pub fn rewind(&mut self) -> Option<HistoryEntry> {
        if self.entries.len() > 1 {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Name of the most recent entry.
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.state.as_str())
    }

    /// Visited state names, oldest first.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.state.as_str()).collect()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.state == name)
    }

    /// Time between the first and the last entry.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.entered_at.signed_duration_since(first.entered_at);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
