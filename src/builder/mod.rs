//! Builder API for ergonomic state machine construction.
//!
//! [`StateMachineBuilder`] assembles a machine in one expression and checks
//! its wiring up front. The helpers below cover the two most common edge
//! shapes.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::StateMachineBuilder;

use crate::core::MachineSnapshot;
use crate::engine::Transition;

/// Create an unconditional transition with no action.
///
/// # Example
///
/// ```
/// use waypoint::builder::simple_transition;
///
/// let transition = simple_transition("Welcome", "MainMenu");
/// assert!(transition.guard().is_none());
/// ```
pub fn simple_transition(from: impl Into<String>, to: impl Into<String>) -> Transition {
    Transition::new(from, to)
}

/// Create a transition gated by a predicate on the stimulus alone.
///
/// # Example
///
/// ```
/// use waypoint::builder::guarded_transition;
///
/// let transition = guarded_transition("MainMenu", "Goodbye", |input| input == "exit");
/// assert!(transition.guard().is_some());
/// ```
pub fn guarded_transition<F>(from: impl Into<String>, to: impl Into<String>, guard: F) -> Transition
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Transition::new(from, to).when(move |input: &str, _: &MachineSnapshot<'_>| guard(input))
}
