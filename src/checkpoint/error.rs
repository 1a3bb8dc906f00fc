//! Checkpoint error types.

use thiserror::Error;

/// One referential problem found in a checkpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityIssue {
    #[error("current state '{0}' is not among the saved states")]
    UnknownCurrentState(String),

    #[error("state history is empty")]
    EmptyHistory,

    #[error("history entry {position} names unsaved state '{name}'")]
    UnknownHistoryState { position: usize, name: String },

    #[error("history ends at '{last}' but current state is '{current}'")]
    HistoryMismatch { last: String, current: String },

    #[error("state '{0}' is saved more than once")]
    DuplicateState(String),
}

/// Errors that can occur while saving or restoring a machine.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// JSON encoding or decoding failed
    #[error("Checkpoint JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Checkpoint version is not supported by this version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The saved states, history and current state disagree
    #[error("Checkpoint of '{machine}' is inconsistent: {details}")]
    Inconsistent { machine: String, details: String },
}
