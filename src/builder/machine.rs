//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::engine::{describe_wiring, DecisionFallback, EngineConfig, StateMachine, Transition};
use std::sync::Arc;
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike registering on a live machine, `build` insists that every
/// transition endpoint names a defined state.
#[derive(Default)]
pub struct StateMachineBuilder {
    name: Option<String>,
    initial: Option<String>,
    states: Vec<State>,
    transitions: Vec<Transition>,
    fallback: Option<Arc<dyn DecisionFallback>>,
    config: EngineConfig,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine name (required).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a state. The first one added is initial unless `.initial()` says otherwise.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Choose the initial state by name.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a transition.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once, keeping their order.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Install a decision fallback.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: DecisionFallback + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the state machine.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let name = self.name.ok_or(BuildError::MissingName)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let initial = match self.initial {
            Some(initial) => initial,
            None => self.states[0].name().to_string(),
        };
        let position = self
            .states
            .iter()
            .position(|state| state.name() == initial)
            .ok_or_else(|| BuildError::UnknownInitialState(initial.clone()))?;

        let mut states = self.states;
        let first = states.remove(position);
        let mut machine = StateMachine::with_initial(name, first);
        for state in states {
            let state_name = state.name().to_string();
            machine
                .add_state(state)
                .map_err(|_| BuildError::DuplicateState(state_name))?;
        }

        for transition in self.transitions {
            machine.add_transition(transition);
        }
        if let Validation::Failure(issues) = machine.validate() {
            return Err(BuildError::Wiring(describe_wiring(&issues)));
        }

        if let Some(fallback) = self.fallback {
            machine.set_shared_fallback(fallback);
        }
        machine.set_config(self.config);

        Ok(machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Decision, DecisionRequest};

    #[test]
    fn builder_requires_name() {
        let result = StateMachineBuilder::new().state(State::new("A")).build();

        assert!(matches!(result, Err(BuildError::MissingName)));
    }

    #[test]
    fn builder_requires_states() {
        let result = StateMachineBuilder::new().name("m").build();

        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn first_state_is_initial_by_default() {
        let machine = StateMachineBuilder::new()
            .name("m")
            .state(State::new("A"))
            .state(State::new("B"))
            .build()
            .unwrap();

        assert_eq!(machine.current_name(), Some("A"));
        assert_eq!(machine.history().names(), vec!["A"]);
    }

    #[test]
    fn explicit_initial_state_wins() {
        let machine = StateMachineBuilder::new()
            .name("m")
            .states([State::new("A"), State::new("B")])
            .initial("B")
            .build()
            .unwrap();

        assert_eq!(machine.current_name(), Some("B"));
        assert_eq!(machine.state_names(), vec!["A", "B"]);
    }

    #[test]
    fn unknown_initial_state_is_rejected() {
        let result = StateMachineBuilder::new()
            .name("m")
            .state(State::new("A"))
            .initial("Z")
            .build();

        assert!(matches!(result, Err(BuildError::UnknownInitialState(ref n)) if n == "Z"));
    }

    #[test]
    fn duplicate_states_are_rejected() {
        let result = StateMachineBuilder::new()
            .name("m")
            .states([State::new("A"), State::new("B"), State::new("A")])
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateState(ref n)) if n == "A"));
    }

    #[test]
    fn dangling_transitions_are_rejected() {
        let result = StateMachineBuilder::new()
            .name("m")
            .state(State::new("A"))
            .transition(Transition::new("A", "B"))
            .transition(Transition::new("C", "A"))
            .build();

        match result {
            Err(BuildError::Wiring(details)) => {
                assert!(details.contains("'B'"));
                assert!(details.contains("'C'"));
            }
            other => panic!(
                "Expected wiring error, got {:?}",
                other.map(|m| m.name().to_string())
            ),
        }
    }

    #[test]
    fn fallback_and_config_are_installed() {
        let machine = StateMachineBuilder::new()
            .name("m")
            .state(State::new("A"))
            .fallback(|_: &DecisionRequest<'_>| -> Option<Decision> { None })
            .config(EngineConfig {
                annotate_decisions: false,
                ..EngineConfig::default()
            })
            .build()
            .unwrap();

        assert!(machine.has_fallback());
        assert!(!machine.config().annotate_decisions);
    }
}
