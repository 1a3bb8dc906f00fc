//! Side-effecting transition actions.

use super::snapshot::MachineSnapshot;
use super::state::StateContent;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised from inside an action.
///
/// Carries the underlying error, when there is one, as its `source()`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Describe the failure and keep `source` in the error chain.
    pub fn from_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Work performed when a transition fires, before the machine moves.
///
/// `content` is a staged copy of the current state's data and metadata.
/// Whatever the action writes there is committed to the current state only
/// if the action returns `Ok`; on `Err` the copy is discarded.
///
/// Implemented for every matching closure.
pub trait Action: Send + Sync {
    fn execute(
        &self,
        snapshot: &MachineSnapshot<'_>,
        content: &mut StateContent,
    ) -> Result<(), ActionError>;
}

impl<F> Action for F
where
    F: Fn(&MachineSnapshot<'_>, &mut StateContent) -> Result<(), ActionError> + Send + Sync,
{
    fn execute(
        &self,
        snapshot: &MachineSnapshot<'_>,
        content: &mut StateContent,
    ) -> Result<(), ActionError> {
        self(snapshot, content)
    }
}

/// Type-erased action stored on a transition.
#[derive(Clone)]
pub struct TransitionAction {
    inner: Arc<dyn Action>,
}

impl TransitionAction {
    pub fn new<A>(action: A) -> Self
    where
        A: Action + 'static,
    {
        Self {
            inner: Arc::new(action),
        }
    }

    pub fn run(
        &self,
        snapshot: &MachineSnapshot<'_>,
        content: &mut StateContent,
    ) -> Result<(), ActionError> {
        self.inner.execute(snapshot, content)
    }
}

impl fmt::Debug for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransitionAction(..)")
    }
}
