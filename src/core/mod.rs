//! Core data model of the state machine.
//!
//! - [`State`] values with their mutable [`StateContent`]
//! - [`Guard`] predicates and [`TransitionAction`]s attached to transitions
//! - [`StateHistory`] of visited state names
//! - [`MachineSnapshot`], the read-only view guards and actions receive
//!
//! Nothing in this module moves a machine; that is the engine's job.

mod action;
mod guard;
mod history;
mod snapshot;
mod state;

pub use action::{Action, ActionError, TransitionAction};
pub use guard::{Condition, ContainsAny, Guard, OneOf};
pub use history::{EntryOrigin, HistoryEntry, StateHistory};
pub use snapshot::MachineSnapshot;
pub use state::{Metadata, State, StateContent, StateId};
