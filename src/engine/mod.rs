//! Transition resolution.
//!
//! This module turns the core data model into a running machine:
//!
//! - [`Transition`]s grouped per source in a [`TransitionIndex`]
//! - [`StateMachine`], which resolves a stimulus to at most one move,
//!   runs its action, and records history
//! - [`DecisionFallback`], the advisory hook consulted when no guard matches
//!
//! Resolution is first-match-wins in registration order. A call either
//! advances exactly one edge with its action fully applied, or changes
//! nothing.

mod config;
mod error;
mod fallback;
mod machine;
mod transition;
mod wiring;

pub use config::EngineConfig;
pub use error::MachineError;
pub use fallback::{Candidate, Decision, DecisionFallback, DecisionRequest};
pub use machine::{StateMachine, StayReason, TransitionOutcome};
pub use transition::{Transition, TransitionIndex};
pub use wiring::WiringIssue;

pub(crate) use wiring::describe as describe_wiring;
