//! Whole-machine wiring checks.
//!
//! `add_transition` binds targets lazily, so a machine can carry edges to
//! states that do not exist yet. These checks report every such edge at
//! once using Stillwater's `Validation`, instead of stopping at the first.

use crate::core::State;
use crate::engine::transition::TransitionIndex;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single wiring problem.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WiringIssue {
    #[error("Transition '{from}' -> '{to}' leaves unregistered state '{from}'")]
    UnknownSource { from: String, to: String },

    #[error("Transition '{from}' -> '{to}' targets unregistered state '{to}'")]
    UnknownTarget { from: String, to: String },
}

/// Check every transition endpoint against the registry.
pub(crate) fn check_wiring(
    states: &HashMap<String, State>,
    transitions: &TransitionIndex,
) -> Validation<(), NonEmptyVec<WiringIssue>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<WiringIssue>>> = Vec::new();

    for transition in transitions.iter() {
        let from = transition.from_state();
        let to = transition.to_state();

        let source = if states.contains_key(from) {
            Validation::success(())
        } else {
            Validation::fail(WiringIssue::UnknownSource {
                from: from.to_string(),
                to: to.to_string(),
            })
        };
        checks.push(source);

        let target = if states.contains_key(to) {
            Validation::success(())
        } else {
            Validation::fail(WiringIssue::UnknownTarget {
                from: from.to_string(),
                to: to.to_string(),
            })
        };
        checks.push(target);
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Join accumulated issues into one line for error messages.
pub(crate) fn describe(issues: &NonEmptyVec<WiringIssue>) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
