//! Checkpoint and restore for state machines.
//!
//! A [`Checkpoint`] captures everything about a machine that is data: its
//! identity, registered states, current state and full history. Guards and
//! actions are code, so they are not saved; after [`StateMachine::restore`]
//! the host registers its transitions again. The saved edge list is kept
//! for inspection and diagrams only.

use crate::core::{State, StateHistory};
use crate::engine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::info;
use uuid::Uuid;

pub mod error;

pub use error::{CheckpointError, IntegrityIssue};

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// A saved transition, by name only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from_state: String,
    pub to_state: String,
    #[serde(default)]
    pub guarded: bool,
}

/// Serializable record of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Machine identifier
    pub id: Uuid,

    /// Machine name, also the key stores save under
    pub name: String,

    /// When the checkpoint was taken
    pub timestamp: DateTime<Utc>,

    /// Name of the active state
    pub current_state: String,

    /// Complete visit history
    pub state_history: StateHistory,

    /// Registered states, sorted by name
    pub states: Vec<State>,

    /// Registered transitions, by name
    #[serde(default)]
    pub transitions: Vec<EdgeRecord>,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that states, history and current state agree, reporting every
    /// disagreement at once.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<IntegrityIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<IntegrityIssue>>> = Vec::new();

        let mut names = HashSet::new();
        for state in &self.states {
            if !names.insert(state.name()) {
                checks.push(Validation::fail(IntegrityIssue::DuplicateState(
                    state.name().to_string(),
                )));
            }
        }

        if !names.contains(self.current_state.as_str()) {
            checks.push(Validation::fail(IntegrityIssue::UnknownCurrentState(
                self.current_state.clone(),
            )));
        }

        match self.state_history.current() {
            None => checks.push(Validation::fail(IntegrityIssue::EmptyHistory)),
            Some(last) if last != self.current_state => {
                checks.push(Validation::fail(IntegrityIssue::HistoryMismatch {
                    last: last.to_string(),
                    current: self.current_state.clone(),
                }))
            }
            Some(_) => {}
        }

        for (position, entry) in self.state_history.entries().iter().enumerate() {
            if !names.contains(entry.state.as_str()) {
                checks.push(Validation::fail(IntegrityIssue::UnknownHistoryState {
                    position,
                    name: entry.state.clone(),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl StateMachine {
    /// Capture the machine's data.
    pub fn checkpoint(&self) -> Result<Checkpoint, CheckpointError> {
        let current_state = self
            .current_name()
            .ok_or_else(|| CheckpointError::Inconsistent {
                machine: self.name().to_string(),
                details: "machine has no current state".to_string(),
            })?
            .to_string();

        let mut states: Vec<State> = self.states().cloned().collect();
        states.sort_by(|a, b| a.name().cmp(b.name()));

        Ok(Checkpoint {
            version: CHECKPOINT_VERSION,
            id: self.id(),
            name: self.name().to_string(),
            timestamp: Utc::now(),
            current_state,
            state_history: self.history().clone(),
            states,
            transitions: self
                .transitions()
                .iter()
                .map(|t| EdgeRecord {
                    from_state: t.from_state().to_string(),
                    to_state: t.to_state().to_string(),
                    guarded: t.guard().is_some(),
                })
                .collect(),
        })
    }

    /// Rebuild a machine from a checkpoint.
    ///
    /// The restored machine has the saved identity, states, current state and
    /// history, and no transitions or fallback.
    pub fn restore(checkpoint: Checkpoint) -> Result<StateMachine, CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if let Validation::Failure(issues) = checkpoint.validate() {
            return Err(CheckpointError::Inconsistent {
                machine: checkpoint.name,
                details: issues
                    .iter()
                    .map(|issue| issue.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        let states: HashMap<String, State> = checkpoint
            .states
            .into_iter()
            .map(|state| (state.name().to_string(), state))
            .collect();

        info!(
            machine = %checkpoint.name,
            current = %checkpoint.current_state,
            history = checkpoint.state_history.len(),
            "restored from checkpoint"
        );

        Ok(StateMachine::from_parts(
            checkpoint.id,
            checkpoint.name,
            states,
            checkpoint.current_state,
            checkpoint.state_history,
        ))
    }
}
