//! Read-only views handed to guards and actions.

use super::history::HistoryEntry;
use super::state::State;

/// Borrowed, read-only view of a machine at resolution time.
///
/// Guards and actions get this instead of the machine itself, so they can
/// inspect where the machine is and how it got there but cannot move it.
#[derive(Clone, Copy, Debug)]
pub struct MachineSnapshot<'a> {
    machine: &'a str,
    current: &'a State,
    history: &'a [HistoryEntry],
}

impl<'a> MachineSnapshot<'a> {
    pub fn new(machine: &'a str, current: &'a State, history: &'a [HistoryEntry]) -> Self {
        Self {
            machine,
            current,
            history,
        }
    }

    /// Name of the machine being resolved.
    pub fn machine(&self) -> &'a str {
        self.machine
    }

    pub fn current_state(&self) -> &'a State {
        self.current
    }

    pub fn current_name(&self) -> &'a str {
        self.current.name()
    }

    pub fn history(&self) -> &'a [HistoryEntry] {
        self.history
    }

    /// The `n` most recent history entries, oldest first.
    pub fn recent(&self, n: usize) -> &'a [HistoryEntry] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Whether `name` has been visited at any point in the recorded history.
    pub fn visited(&self, name: &str) -> bool {
        self.history.iter().any(|entry| entry.state == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::{EntryOrigin, StateHistory};

    #[test]
    fn recent_clamps_to_available_history() {
        let current = State::new("C");
        let mut history = StateHistory::seeded("A");
        history.record("B", EntryOrigin::Guard { index: 0 });
        history.record("C", EntryOrigin::Guard { index: 0 });

        let snapshot = MachineSnapshot::new("m", &current, history.entries());

        assert_eq!(snapshot.recent(2).len(), 2);
        assert_eq!(snapshot.recent(2)[0].state, "B");
        assert_eq!(snapshot.recent(10).len(), 3);
        assert!(snapshot.visited("A"));
        assert!(!snapshot.visited("Z"));
        assert_eq!(snapshot.current_name(), "C");
    }
}
