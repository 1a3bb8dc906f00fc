//! Errors raised while registering, firing and rolling back.

use crate::core::ActionError;
use thiserror::Error;

/// Errors that can occur while operating a state machine.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("State '{name}' is already registered")]
    DuplicateState { name: String },

    #[error("Transition from '{from}' targets unregistered state '{to}'")]
    UnknownTargetState { from: String, to: String },

    #[error("Action on transition '{from}' -> '{to}' failed: {source}")]
    ActionExecution {
        from: String,
        to: String,
        #[source]
        source: ActionError,
    },

    #[error("No previous state to return to from '{current}'")]
    NoPreviousState { current: String },

    #[error("Machine '{machine}' has no current state; register a state first")]
    NoCurrentState { machine: String },

    #[error("State '{name}' is not registered")]
    UnknownState { name: String },

    #[error("State '{name}' is referenced by history and cannot be removed")]
    StateInHistory { name: String },
}
