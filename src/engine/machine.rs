//! The state machine and its transition resolution engine.

use crate::core::{EntryOrigin, MachineSnapshot, State, StateHistory, StateId};
use crate::engine::config::EngineConfig;
use crate::engine::error::MachineError;
use crate::engine::fallback::{Candidate, Decision, DecisionFallback, DecisionRequest};
use crate::engine::transition::{Transition, TransitionIndex};
use crate::engine::wiring::{check_wiring, WiringIssue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why a `trigger_transition` call left the machine where it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StayReason {
    /// The current state has no outgoing transitions
    NoCandidates,
    /// No guard matched and no fallback was consulted
    NoEligibleTransition,
    /// No guard matched and the fallback made no usable decision
    FallbackAbstained,
}

/// Result of a `trigger_transition` call that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The machine moved along exactly one edge
    Moved {
        from: String,
        to: String,
        origin: EntryOrigin,
    },
    /// The machine did not move; nothing was recorded
    Stayed(StayReason),
}

impl TransitionOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// Name of the state moved to, if the machine moved.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Moved { to, .. } => Some(to),
            Self::Stayed(_) => None,
        }
    }
}

/// A finite-state machine with exactly one active state.
///
/// The machine is single-writer: `trigger_transition`, `move_to_previous_state`
/// and registration all take `&mut self`, so callers sharing a machine across
/// threads wrap it in their own lock.
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
/// use waypoint::engine::{StateMachine, Transition};
///
/// let mut machine = StateMachine::new("support");
/// machine.add_state(State::new("Welcome")).unwrap();
/// machine.add_state(State::new("MainMenu")).unwrap();
/// machine.add_state(State::new("Goodbye")).unwrap();
///
/// machine.add_transition(Transition::new("Welcome", "MainMenu"));
/// machine.add_transition(Transition::new("MainMenu", "Goodbye").when(|input, _| input == "exit"));
///
/// machine.trigger_transition("hi").unwrap();
/// machine.trigger_transition("exit").unwrap();
///
/// assert_eq!(machine.current_name(), Some("Goodbye"));
/// assert_eq!(machine.history().names(), vec!["Welcome", "MainMenu", "Goodbye"]);
/// ```
pub struct StateMachine {
    id: Uuid,
    name: String,
    states: HashMap<String, State>,
    current: Option<String>,
    history: StateHistory,
    transitions: TransitionIndex,
    fallback: Option<Arc<dyn DecisionFallback>>,
    config: EngineConfig,
}

impl StateMachine {
    /// Create an empty machine. The first registered state becomes current.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            states: HashMap::new(),
            current: None,
            history: StateHistory::new(),
            transitions: TransitionIndex::new(),
            fallback: None,
            config: EngineConfig::default(),
        }
    }

    /// Create a machine that starts in `initial`.
    pub fn with_initial(name: impl Into<String>, initial: State) -> Self {
        let mut machine = Self::new(name);
        let initial_name = initial.name().to_string();
        machine.states.insert(initial_name.clone(), initial);
        machine.history = StateHistory::seeded(initial_name.clone());
        machine.current = Some(initial_name);
        machine
    }

    /// Reassemble a machine from persisted parts. Callers validate first.
    pub(crate) fn from_parts(
        id: Uuid,
        name: String,
        states: HashMap<String, State>,
        current: String,
        history: StateHistory,
    ) -> Self {
        Self {
            id,
            name,
            states,
            current: Some(current),
            history,
            transitions: TransitionIndex::new(),
            fallback: None,
            config: EngineConfig::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Install the fallback consulted when no guard matches.
    pub fn set_fallback<F>(&mut self, fallback: F)
    where
        F: DecisionFallback + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
    }

    pub(crate) fn set_shared_fallback(&mut self, fallback: Arc<dyn DecisionFallback>) {
        self.fallback = Some(fallback);
    }

    pub fn clear_fallback(&mut self) {
        self.fallback = None;
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Register a state.
    ///
    /// The first state registered on an empty machine becomes current and
    /// seeds the history.
    pub fn add_state(&mut self, state: State) -> Result<(), MachineError> {
        let name = state.name().to_string();
        if self.states.contains_key(&name) {
            return Err(MachineError::DuplicateState { name });
        }

        self.states.insert(name.clone(), state);
        if self.current.is_none() {
            debug!(machine = %self.name, state = %name, "initial state registered");
            self.history = StateHistory::seeded(name.clone());
            self.current = Some(name);
        }
        Ok(())
    }

    /// Deregister a state that the machine has never been in.
    ///
    /// States named anywhere in history (the current state included) are
    /// pinned, so rollback can always resolve the names it pops back to.
    pub fn remove_state(&mut self, name: &str) -> Result<State, MachineError> {
        if self.current.as_deref() == Some(name) || self.history.contains(name) {
            return Err(MachineError::StateInHistory {
                name: name.to_string(),
            });
        }
        self.states
            .remove(name)
            .ok_or_else(|| MachineError::UnknownState {
                name: name.to_string(),
            })
    }

    /// Register a transition. The target is only resolved when it fires.
    pub fn add_transition(&mut self, transition: Transition) {
        let index = self.transitions.insert(transition);
        debug!(machine = %self.name, index, "transition registered");
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Find a registered state by id.
    pub fn state_by_id(&self, id: StateId) -> Option<&State> {
        self.states.values().find(|state| state.id() == id)
    }

    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Registered state names, sorted.
    pub fn state_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.states.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn current_state(&self) -> Option<&State> {
        self.current.as_deref().and_then(|name| self.states.get(name))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn transitions(&self) -> &TransitionIndex {
        &self.transitions
    }

    /// Read-only view of the machine, as guards and actions see it.
    pub fn snapshot(&self) -> Option<MachineSnapshot<'_>> {
        self.current_state()
            .map(|current| MachineSnapshot::new(&self.name, current, self.history.entries()))
    }

    /// Report every transition endpoint that does not name a registered state.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<WiringIssue>> {
        check_wiring(&self.states, &self.transitions)
    }

    /// Resolve `stimulus` against the current state's outgoing transitions.
    ///
    /// Candidates are tried in registration order and the first eligible one
    /// fires. If none is eligible, the decision fallback (when configured)
    /// may pick one of the declared candidates. A move runs the transition's
    /// action on a staged copy of the current state, commits it, switches the
    /// current state and appends to history. Any failure leaves the machine
    /// exactly as it was.
    pub fn trigger_transition(&mut self, stimulus: &str) -> Result<TransitionOutcome, MachineError> {
        let from = self
            .current
            .clone()
            .ok_or_else(|| MachineError::NoCurrentState {
                machine: self.name.clone(),
            })?;
        let current = self
            .states
            .get(&from)
            .ok_or_else(|| MachineError::UnknownState { name: from.clone() })?;

        let candidates = self.transitions.candidates(&from);
        if candidates.is_empty() {
            debug!(machine = %self.name, state = %from, "no outgoing transitions");
            return Ok(TransitionOutcome::Stayed(StayReason::NoCandidates));
        }

        let snapshot = MachineSnapshot::new(&self.name, current, self.history.entries());

        let matched = candidates
            .iter()
            .position(|transition| transition.is_eligible(stimulus, &snapshot));

        let (index, origin, decision) = match matched {
            Some(index) => (index, EntryOrigin::Guard { index }, None),
            None => match self.consult_fallback(stimulus, &snapshot, candidates) {
                Ok((index, decision)) => (index, EntryOrigin::Fallback { index }, Some(decision)),
                Err(reason) => {
                    debug!(machine = %self.name, state = %from, ?reason, "machine stays");
                    return Ok(TransitionOutcome::Stayed(reason));
                }
            },
        };

        let transition = &candidates[index];
        let to = transition.to_state().to_string();
        if !self.states.contains_key(&to) {
            return Err(MachineError::UnknownTargetState { from, to });
        }

        let staged = match transition.action() {
            Some(action) => {
                let mut content = current.content().clone();
                action
                    .run(&snapshot, &mut content)
                    .map_err(|source| MachineError::ActionExecution {
                        from: from.clone(),
                        to: to.clone(),
                        source,
                    })?;
                Some(content)
            }
            None => None,
        };

        // Everything that can fail has run; commit.
        if let Some(content) = staged {
            if let Some(state) = self.states.get_mut(&from) {
                state.replace_content(content);
            }
        }
        if let Some(decision) = decision.filter(|_| self.config.annotate_decisions) {
            if let Some(target) = self.states.get_mut(&to) {
                target
                    .content_mut()
                    .annotate_decision(decision.prompt, decision.response);
            }
        }
        self.history.record(to.clone(), origin);
        self.current = Some(to.clone());

        info!(machine = %self.name, from = %from, to = %to, ?origin, "transitioned");
        Ok(TransitionOutcome::Moved { from, to, origin })
    }

    fn consult_fallback(
        &self,
        stimulus: &str,
        snapshot: &MachineSnapshot<'_>,
        candidates: &[Transition],
    ) -> Result<(usize, Decision), StayReason> {
        let fallback = match &self.fallback {
            Some(fallback) if self.config.consult_fallback => fallback,
            _ => return Err(StayReason::NoEligibleTransition),
        };

        let request = DecisionRequest {
            stimulus,
            snapshot: *snapshot,
            candidates: candidates
                .iter()
                .enumerate()
                .map(|(index, transition)| Candidate {
                    index,
                    to_state: transition.to_state(),
                    guarded: transition.guard().is_some(),
                })
                .collect(),
        };

        let Some(decision) = fallback.decide(&request) else {
            return Err(StayReason::FallbackAbstained);
        };

        match request.candidate_for(&decision.to_state) {
            Some(candidate) => Ok((candidate.index, decision)),
            None => {
                warn!(
                    machine = %self.name,
                    state = %snapshot.current_name(),
                    suggested = %decision.to_state,
                    "fallback suggested an undeclared target; ignoring"
                );
                Err(StayReason::FallbackAbstained)
            }
        }
    }

    /// Rewind to the previous history entry.
    ///
    /// Pops the latest entry and makes the one beneath it current. No guard
    /// or action runs. Fails with `NoPreviousState` when only the seed entry
    /// is left.
    pub fn move_to_previous_state(&mut self) -> Result<&State, MachineError> {
        let current = self
            .current
            .clone()
            .ok_or_else(|| MachineError::NoCurrentState {
                machine: self.name.clone(),
            })?;

        let entries = self.history.entries();
        if entries.len() < 2 {
            return Err(MachineError::NoPreviousState { current });
        }
        let previous = entries[entries.len() - 2].state.clone();
        if !self.states.contains_key(&previous) {
            return Err(MachineError::UnknownState { name: previous });
        }

        self.history.rewind();
        self.current = Some(previous.clone());
        info!(machine = %self.name, from = %current, to = %previous, "rolled back");

        self.states
            .get(&previous)
            .ok_or(MachineError::UnknownState { name: previous })
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("current", &self.current)
            .field("states", &self.state_names())
            .field("history", &self.history.names())
            .field("transitions", &self.transitions.len())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActionError, MachineSnapshot, StateContent};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn support_machine() -> StateMachine {
        let mut machine = StateMachine::new("support");
        machine.add_state(State::new("Welcome")).unwrap();
        machine.add_state(State::new("MainMenu")).unwrap();
        machine.add_state(State::new("Goodbye")).unwrap();
        machine.add_transition(Transition::new("Welcome", "MainMenu"));
        machine.add_transition(
            Transition::new("MainMenu", "Goodbye").when(|input, _| input == "exit"),
        );
        machine
    }

    #[test]
    fn first_registered_state_becomes_current() {
        let mut machine = StateMachine::new("m");
        assert!(machine.current_state().is_none());

        machine.add_state(State::new("A")).unwrap();
        machine.add_state(State::new("B")).unwrap();

        assert_eq!(machine.current_name(), Some("A"));
        assert_eq!(machine.history().names(), vec!["A"]);
    }

    #[test]
    fn with_initial_seeds_history() {
        let machine = StateMachine::with_initial("m", State::new("Start"));

        assert_eq!(machine.current_name(), Some("Start"));
        assert_eq!(machine.history().entries()[0].origin, EntryOrigin::Initial);
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut machine = StateMachine::new("m");
        machine.add_state(State::new("A")).unwrap();

        let err = machine.add_state(State::new("A")).unwrap_err();

        assert!(matches!(err, MachineError::DuplicateState { ref name } if name == "A"));
        assert_eq!(machine.state_names(), vec!["A"]);
    }

    #[test]
    fn guarded_scenario_moves_through_states() {
        let mut machine = support_machine();

        let outcome = machine.trigger_transition("hi").unwrap();
        assert_eq!(outcome.target(), Some("MainMenu"));

        let outcome = machine.trigger_transition("hello").unwrap();
        assert_eq!(outcome, TransitionOutcome::Stayed(StayReason::NoEligibleTransition));
        assert_eq!(machine.current_name(), Some("MainMenu"));

        machine.trigger_transition("exit").unwrap();
        assert_eq!(machine.history().names(), vec!["Welcome", "MainMenu", "Goodbye"]);
    }

    #[test]
    fn terminal_state_is_a_no_op() {
        let mut machine = StateMachine::with_initial("m", State::new("Done"));

        let outcome = machine.trigger_transition("anything").unwrap();

        assert_eq!(outcome, TransitionOutcome::Stayed(StayReason::NoCandidates));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn empty_machine_cannot_fire() {
        let mut machine = StateMachine::new("m");

        assert!(matches!(
            machine.trigger_transition("x"),
            Err(MachineError::NoCurrentState { .. })
        ));
        assert!(matches!(
            machine.move_to_previous_state(),
            Err(MachineError::NoCurrentState { .. })
        ));
    }

    #[test]
    fn first_match_wins_over_later_guards() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        machine.add_state(State::new("C")).unwrap();
        machine.add_transition(Transition::new("A", "B"));
        machine.add_transition(Transition::new("A", "C").when(|_, _| true));

        let outcome = machine.trigger_transition("x").unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::Moved {
                from: "A".to_string(),
                to: "B".to_string(),
                origin: EntryOrigin::Guard { index: 0 },
            }
        );
    }

    #[test]
    fn unknown_target_leaves_machine_untouched() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        machine.add_transition(Transition::new("A", "Missing").then(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        let err = machine.trigger_transition("go").unwrap_err();

        assert!(matches!(
            err,
            MachineError::UnknownTargetState { ref from, ref to } if from == "A" && to == "Missing"
        ));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(machine.current_name(), Some("A"));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn late_bound_target_resolves_once_registered() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_transition(Transition::new("A", "B"));
        assert!(machine.trigger_transition("go").is_err());

        machine.add_state(State::new("B")).unwrap();

        assert!(machine.trigger_transition("go").unwrap().is_moved());
        assert_eq!(machine.current_name(), Some("B"));
    }

    #[test]
    fn action_updates_source_state_before_moving() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        machine.add_transition(Transition::new("A", "B").then(|snapshot, content| {
            content.update_data("left_from", snapshot.current_name());
            Ok(())
        }));

        machine.trigger_transition("go").unwrap();

        assert_eq!(machine.state("A").unwrap().data()["left_from"], json!("A"));
        assert!(machine.state("B").unwrap().data().is_empty());
    }

    #[test]
    fn failing_action_discards_staged_changes() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        machine.add_transition(Transition::new("A", "B").then(
            |_: &MachineSnapshot<'_>, content: &mut StateContent| {
                content.update_data("half", "written");
                Err(ActionError::new("boom"))
            },
        ));

        let err = machine.trigger_transition("go").unwrap_err();

        match err {
            MachineError::ActionExecution { from, to, source } => {
                assert_eq!(from, "A");
                assert_eq!(to, "B");
                assert_eq!(source.message(), "boom");
            }
            other => panic!("Expected ActionExecution, got {other:?}"),
        }
        assert!(machine.state("A").unwrap().data().is_empty());
        assert_eq!(machine.current_name(), Some("A"));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn action_failure_keeps_underlying_cause() {
        use std::error::Error as _;

        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        machine.add_transition(Transition::new("A", "B").then(|_, _| {
            let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "order 42 missing");
            Err(ActionError::from_source("lookup failed", cause))
        }));

        let err = machine.trigger_transition("go").unwrap_err();

        let action = err.source().expect("action error is the source");
        assert_eq!(action.to_string(), "lookup failed");
        let cause = action.source().expect("io error is kept");
        assert_eq!(cause.to_string(), "order 42 missing");
        assert_eq!(machine.current_name(), Some("A"));
    }

    #[test]
    fn action_runs_exactly_once_per_move() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        machine.add_transition(Transition::new("A", "B").then(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        machine.trigger_transition("go").unwrap();
        machine.move_to_previous_state().unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rollback_walks_back_to_seed() {
        let mut machine = support_machine();
        machine.trigger_transition("hi").unwrap();
        machine.trigger_transition("exit").unwrap();

        assert_eq!(machine.move_to_previous_state().unwrap().name(), "MainMenu");
        assert_eq!(machine.move_to_previous_state().unwrap().name(), "Welcome");

        let err = machine.move_to_previous_state().unwrap_err();
        assert!(matches!(err, MachineError::NoPreviousState { ref current } if current == "Welcome"));
        assert_eq!(machine.history().names(), vec!["Welcome"]);
    }

    #[test]
    fn fallback_picks_among_declared_targets() {
        let mut machine = support_machine();
        machine.set_fallback(|req: &DecisionRequest<'_>| {
            Some(Decision::to(req.targets()[0]).with_exchange("prompt", "Goodbye"))
        });
        machine.trigger_transition("hi").unwrap();

        let outcome = machine.trigger_transition("see you").unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::Moved {
                from: "MainMenu".to_string(),
                to: "Goodbye".to_string(),
                origin: EntryOrigin::Fallback { index: 0 },
            }
        );
        let metadata = machine.state("Goodbye").unwrap().metadata();
        assert_eq!(metadata.decision_prompt.as_deref(), Some("prompt"));
        assert_eq!(metadata.decision_response.as_deref(), Some("Goodbye"));
        assert_eq!(
            machine.history().entries().last().unwrap().origin,
            EntryOrigin::Fallback { index: 0 }
        );
    }

    #[test]
    fn fallback_cannot_invent_edges() {
        let mut machine = support_machine();
        machine.set_fallback(|_: &DecisionRequest<'_>| Some(Decision::to("Welcome")));
        machine.trigger_transition("hi").unwrap();

        let outcome = machine.trigger_transition("back please").unwrap();

        assert_eq!(outcome, TransitionOutcome::Stayed(StayReason::FallbackAbstained));
        assert_eq!(machine.current_name(), Some("MainMenu"));
    }

    #[test]
    fn abstaining_fallback_is_a_no_op() {
        let mut machine = support_machine();
        machine.set_fallback(|_: &DecisionRequest<'_>| -> Option<Decision> { None });
        machine.trigger_transition("hi").unwrap();

        let outcome = machine.trigger_transition("hmm").unwrap();

        assert_eq!(outcome, TransitionOutcome::Stayed(StayReason::FallbackAbstained));
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn disabled_fallback_is_not_consulted() {
        let mut machine = support_machine();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        machine.set_fallback(move |_: &DecisionRequest<'_>| -> Option<Decision> {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });
        machine.set_config(EngineConfig {
            consult_fallback: false,
            ..EngineConfig::default()
        });
        machine.trigger_transition("hi").unwrap();

        let outcome = machine.trigger_transition("hmm").unwrap();

        assert_eq!(outcome, TransitionOutcome::Stayed(StayReason::NoEligibleTransition));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fallback_runs_the_chosen_transition_action() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        machine.add_transition(
            Transition::new("A", "B")
                .when(|_, _| false)
                .then(|_, content| {
                    content.set_custom("via", "fallback");
                    Ok(())
                }),
        );
        machine.set_config(EngineConfig {
            annotate_decisions: false,
            ..EngineConfig::default()
        });
        machine.set_fallback(|_: &DecisionRequest<'_>| Some(Decision::to("B").with_exchange("p", "r")));

        machine.trigger_transition("x").unwrap();

        assert_eq!(
            machine.state("A").unwrap().metadata().custom_data["via"],
            json!("fallback")
        );
        assert!(machine.state("B").unwrap().metadata().decision_prompt.is_none());
    }

    #[test]
    fn states_in_history_cannot_be_removed() {
        let mut machine = support_machine();
        machine.add_state(State::new("Unused")).unwrap();
        machine.trigger_transition("hi").unwrap();
        machine.move_to_previous_state().unwrap();

        assert!(matches!(
            machine.remove_state("Welcome"),
            Err(MachineError::StateInHistory { .. })
        ));
        assert!(matches!(
            machine.remove_state("Nowhere"),
            Err(MachineError::UnknownState { .. })
        ));
        assert_eq!(machine.remove_state("Unused").unwrap().name(), "Unused");
        // MainMenu was rolled back out of history, so it is free again.
        assert!(machine.remove_state("MainMenu").is_ok());
    }

    #[test]
    fn validate_reports_dangling_transitions() {
        let mut machine = support_machine();
        assert!(machine.validate().is_success());

        machine.add_transition(Transition::new("Goodbye", "Elsewhere"));

        assert!(machine.validate().is_failure());
    }

    #[test]
    fn guards_see_the_live_history() {
        let mut machine = StateMachine::with_initial("m", State::new("A"));
        machine.add_state(State::new("B")).unwrap();
        machine.add_state(State::new("C")).unwrap();
        machine.add_transition(Transition::new("A", "C").when(|_, s| s.visited("B")));
        machine.add_transition(Transition::new("A", "B"));
        machine.add_transition(Transition::new("B", "A"));

        assert_eq!(machine.trigger_transition("x").unwrap().target(), Some("B"));
        assert_eq!(machine.trigger_transition("x").unwrap().target(), Some("A"));
        assert_eq!(machine.trigger_transition("x").unwrap().target(), Some("C"));
        assert_eq!(machine.history().names(), vec!["A", "B", "A", "C"]);
    }
}
