//! Waypoint: a deterministic state machine engine for autonomous agents
//!
//! An agent's behaviour is modelled as named states connected by
//! transitions. Each incoming stimulus (a user message, a tool result) is
//! resolved against the current state's outgoing transitions: the first
//! transition whose guard accepts the stimulus fires, its action runs, and
//! the machine moves. When nothing matches, an optional decision fallback,
//! typically backed by a language model, may pick one of the declared
//! edges. It can never invent a new one.
//!
//! # Core Concepts
//!
//! - **State**: a named node carrying free-form data and metadata
//! - **Transition**: a directed edge with an optional guard and action
//! - **History**: the ordered list of visited states, supporting rollback
//! - **Checkpoint**: the serializable part of a machine, for stores
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::StateMachineBuilder;
//! use waypoint::core::State;
//! use waypoint::engine::Transition;
//!
//! let mut machine = StateMachineBuilder::new()
//!     .name("support")
//!     .state(State::new("Welcome"))
//!     .state(State::new("MainMenu"))
//!     .state(State::new("Goodbye"))
//!     .transition(Transition::new("Welcome", "MainMenu"))
//!     .transition(Transition::new("MainMenu", "Goodbye").when(|input, _| input == "exit"))
//!     .build()
//!     .unwrap();
//!
//! machine.trigger_transition("hi").unwrap();
//! machine.trigger_transition("exit").unwrap();
//! assert_eq!(machine.history().names(), vec!["Welcome", "MainMenu", "Goodbye"]);
//!
//! machine.move_to_previous_state().unwrap();
//! assert_eq!(machine.current_name(), Some("MainMenu"));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod oracle;
pub mod render;
pub mod store;

// Re-export commonly used types
pub use checkpoint::Checkpoint;
pub use crate::core::{Guard, State, StateHistory};
pub use engine::{MachineError, StateMachine, Transition, TransitionOutcome};
