//! Guard predicates for controlling state transitions.
//!
//! Guards decide whether a transition is eligible for a given stimulus.
//! They see the stimulus and a read-only [`MachineSnapshot`], nothing more.

use super::snapshot::MachineSnapshot;
use std::fmt;
use std::sync::Arc;

/// A predicate over `(stimulus, snapshot)`.
///
/// Implemented for every `Fn(&str, &MachineSnapshot<'_>) -> bool`, so plain
/// closures and free functions can be used directly. Implement it on a type
/// when the predicate carries configuration of its own.
pub trait Condition: Send + Sync {
    fn evaluate(&self, stimulus: &str, snapshot: &MachineSnapshot<'_>) -> bool;
}

impl<F> Condition for F
where
    F: Fn(&str, &MachineSnapshot<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, stimulus: &str, snapshot: &MachineSnapshot<'_>) -> bool {
        self(stimulus, snapshot)
    }
}

/// Matches when the stimulus equals one of a fixed set of words,
/// ignoring case and surrounding whitespace.
#[derive(Clone, Debug)]
pub struct OneOf {
    words: Vec<String>,
}

impl OneOf {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            words: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }
}

impl Condition for OneOf {
    fn evaluate(&self, stimulus: &str, _snapshot: &MachineSnapshot<'_>) -> bool {
        let stimulus = stimulus.trim().to_lowercase();
        self.words.iter().any(|w| *w == stimulus)
    }
}

/// Matches when the stimulus contains any of a set of keywords,
/// ignoring case.
#[derive(Clone, Debug)]
pub struct ContainsAny {
    keywords: Vec<String>,
}

impl ContainsAny {
    pub fn new<I, W>(keywords: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|w| w.into().to_lowercase())
                .collect(),
        }
    }
}

impl Condition for ContainsAny {
    fn evaluate(&self, stimulus: &str, _snapshot: &MachineSnapshot<'_>) -> bool {
        let stimulus = stimulus.to_lowercase();
        self.keywords.iter().any(|k| stimulus.contains(k.as_str()))
    }
}

/// A shareable, type-erased guard attached to a transition.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Guard, MachineSnapshot, State};
///
/// let is_exit = Guard::new(|input: &str, _: &MachineSnapshot<'_>| input == "exit");
///
/// let current = State::new("MainMenu");
/// let snapshot = MachineSnapshot::new("demo", &current, &[]);
///
/// assert!(is_exit.check("exit", &snapshot));
/// assert!(!is_exit.check("hello", &snapshot));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Condition>,
}

impl Guard {
    pub fn new<C>(condition: C) -> Self
    where
        C: Condition + 'static,
    {
        Guard {
            predicate: Arc::new(condition),
        }
    }

    /// Evaluate the guard against a stimulus.
    pub fn check(&self, stimulus: &str, snapshot: &MachineSnapshot<'_>) -> bool {
        self.predicate.evaluate(stimulus, snapshot)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
