//! Transitions and the per-source transition index.

use crate::core::{
    Action, ActionError, Condition, Guard, MachineSnapshot, StateContent, TransitionAction,
};
use std::collections::HashMap;

/// A directed edge between two state names.
///
/// Both the guard and the action are optional: no guard means the
/// transition is always eligible, no action means nothing runs before
/// the machine moves.
///
/// # Example
///
/// ```rust
/// use waypoint::engine::Transition;
///
/// let leave = Transition::new("MainMenu", "Goodbye").when(|input, _| input == "exit");
///
/// assert_eq!(leave.from_state(), "MainMenu");
/// assert_eq!(leave.to_state(), "Goodbye");
/// assert!(leave.guard().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Transition {
    from_state: String,
    to_state: String,
    guard: Option<Guard>,
    action: Option<TransitionAction>,
}

impl Transition {
    /// An unconditional transition with no action.
    pub fn new(from_state: impl Into<String>, to_state: impl Into<String>) -> Self {
        Self {
            from_state: from_state.into(),
            to_state: to_state.into(),
            guard: None,
            action: None,
        }
    }

    /// Gate the transition with a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&str, &MachineSnapshot<'_>) -> bool + Send + Sync + 'static,
    {
        self.guarded_by(predicate)
    }

    /// Gate the transition with any [`Condition`].
    pub fn guarded_by<C>(mut self, condition: C) -> Self
    where
        C: Condition + 'static,
    {
        self.guard = Some(Guard::new(condition));
        self
    }

    /// Gate the transition with an existing guard.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Run a closure when the transition fires.
    pub fn then<F>(self, action: F) -> Self
    where
        F: Fn(&MachineSnapshot<'_>, &mut StateContent) -> Result<(), ActionError>
            + Send
            + Sync
            + 'static,
    {
        self.performing(action)
    }

    /// Run any [`Action`] when the transition fires.
    pub fn performing<A>(mut self, action: A) -> Self
    where
        A: Action + 'static,
    {
        self.action = Some(TransitionAction::new(action));
        self
    }

    pub fn from_state(&self) -> &str {
        &self.from_state
    }

    pub fn to_state(&self) -> &str {
        &self.to_state
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    pub fn action(&self) -> Option<&TransitionAction> {
        self.action.as_ref()
    }

    /// Whether this transition is eligible for the stimulus.
    pub fn is_eligible(&self, stimulus: &str, snapshot: &MachineSnapshot<'_>) -> bool {
        match &self.guard {
            Some(guard) => guard.check(stimulus, snapshot),
            None => true,
        }
    }
}

/// Transitions grouped by source state, in registration order.
#[derive(Clone, Debug, Default)]
pub struct TransitionIndex {
    buckets: HashMap<String, Vec<Transition>>,
    sources: Vec<String>,
    len: usize,
}

impl TransitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transition to its source bucket, returning its position
    /// within that bucket.
    pub fn insert(&mut self, transition: Transition) -> usize {
        if !self.buckets.contains_key(transition.from_state()) {
            self.sources.push(transition.from_state.clone());
        }
        let bucket = self
            .buckets
            .entry(transition.from_state.clone())
            .or_default();
        bucket.push(transition);
        self.len += 1;
        bucket.len() - 1
    }

    /// Outgoing transitions of `from_state`, in registration order.
    pub fn candidates(&self, from_state: &str) -> &[Transition] {
        self.buckets
            .get(from_state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every transition, grouped by source in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.sources
            .iter()
            .flat_map(move |source| self.candidates(source).iter())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
