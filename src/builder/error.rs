//! Build errors for the state machine builder.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Machine name not specified. Call .name(name) before .build()")]
    MissingName,

    #[error("No states defined. Add at least one state")]
    NoStates,

    #[error("State '{0}' is defined more than once")]
    DuplicateState(String),

    #[error("Initial state '{0}' is not among the defined states")]
    UnknownInitialState(String),

    #[error("Transitions reference undefined states: {0}")]
    Wiring(String),
}
