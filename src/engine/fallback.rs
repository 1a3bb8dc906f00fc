//! Advisory decision fallback.
//!
//! When no guard matches, the engine may ask a [`DecisionFallback`] to pick
//! one of the declared outgoing transitions. The fallback can only choose
//! among targets it was offered; anything else is treated as no decision.

use crate::core::MachineSnapshot;

/// One outgoing transition offered to the fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Position within the source bucket
    pub index: usize,
    pub to_state: &'a str,
    /// Whether the transition carries a guard (which, here, did not match)
    pub guarded: bool,
}

/// Everything a fallback gets to look at.
#[derive(Clone, Debug)]
pub struct DecisionRequest<'a> {
    pub stimulus: &'a str,
    pub snapshot: MachineSnapshot<'a>,
    pub candidates: Vec<Candidate<'a>>,
}

impl<'a> DecisionRequest<'a> {
    pub fn current_state(&self) -> &'a str {
        self.snapshot.current_name()
    }

    /// Distinct target names, in registration order.
    pub fn targets(&self) -> Vec<&'a str> {
        let mut targets: Vec<&'a str> = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            if !targets.contains(&candidate.to_state) {
                targets.push(candidate.to_state);
            }
        }
        targets
    }

    /// First candidate leading to `target`, if any.
    pub fn candidate_for(&self, target: &str) -> Option<&Candidate<'a>> {
        self.candidates.iter().find(|c| c.to_state == target)
    }
}

/// A fallback's pick, with the exchange that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub to_state: String,
    pub prompt: Option<String>,
    pub response: Option<String>,
}

impl Decision {
    pub fn to(to_state: impl Into<String>) -> Self {
        Self {
            to_state: to_state.into(),
            prompt: None,
            response: None,
        }
    }

    /// Attach the prompt/response pair so the engine can annotate the target state.
    pub fn with_exchange(mut self, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self.response = Some(response.into());
        self
    }
}

/// Consulted when no candidate guard matches.
///
/// Implementations may perform external I/O but must not reach back into
/// the machine. Returning `None` means "no decision" and leaves the
/// machine where it is.
pub trait DecisionFallback: Send + Sync {
    fn decide(&self, request: &DecisionRequest<'_>) -> Option<Decision>;
}

impl<F> DecisionFallback for F
where
    F: Fn(&DecisionRequest<'_>) -> Option<Decision> + Send + Sync,
{
    fn decide(&self, request: &DecisionRequest<'_>) -> Option<Decision> {
        self(request)
    }
}
