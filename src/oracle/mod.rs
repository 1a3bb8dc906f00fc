//! Decision fallback backed by an external oracle, such as a language model.
//!
//! The oracle itself is a collaborator: this module only builds the context
//! it is asked about, and turns its untrusted reply into a [`Decision`].
//! Oracle failures and unusable replies become "no decision".

use crate::engine::{Decision, DecisionFallback, DecisionRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors an oracle can report.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle request failed: {0}")]
    RequestFailed(String),

    #[error("Oracle timed out after {millis}ms")]
    TimedOut { millis: u64 },
}

/// What the oracle suggested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Suggestion {
    /// A structured pick of the next state
    NextState(String),
    /// Free text that may name a state, or carry `{"next_state": "..."}`
    Text(String),
    /// The oracle declined to choose
    Abstain,
}

/// Structured reply shape: `{"next_state": "<name>"}`.
#[derive(Debug, Deserialize)]
struct NextStateReply {
    next_state: String,
}

impl Suggestion {
    /// Resolve the suggestion to one of `options`.
    ///
    /// An exact name wins. Failing that, a case-insensitive match is
    /// accepted only when it is unambiguous, and resolves to the spelling
    /// in `options`. Anything else resolves to `None`.
    pub fn resolve(&self, options: &[&str]) -> Option<String> {
        match self {
            Self::NextState(name) => match_option(name.trim(), options),
            Self::Text(text) => match structured_reply(text) {
                Some(name) => match_option(name.trim(), options),
                None => match_option(strip_decoration(text), options),
            },
            Self::Abstain => None,
        }
    }

    fn raw(&self) -> Option<&str> {
        match self {
            Self::NextState(text) | Self::Text(text) => Some(text),
            Self::Abstain => None,
        }
    }
}

fn match_option(raw: &str, options: &[&str]) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if let Some(exact) = options.iter().find(|option| **option == raw) {
        return Some(exact.to_string());
    }

    let mut folded = options
        .iter()
        .filter(|option| option.eq_ignore_ascii_case(raw));
    match (folded.next(), folded.next()) {
        (Some(only), None) => Some(only.to_string()),
        _ => None,
    }
}

/// `{"next_state": "..."}` embedded anywhere in the text.
fn structured_reply(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str::<NextStateReply>(&text[start..=end])
        .ok()
        .map(|reply| reply.next_state)
}

/// Strip surrounding whitespace, quotes and punctuation.
fn strip_decoration(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '.' | '!'))
}

/// Context handed to the oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecisionPrompt {
    /// Instruction listing the options and the expected reply shape
    pub system: String,
    /// State the machine is in
    pub current_state: String,
    /// Recent state names, oldest first
    pub recent_history: Vec<String>,
    /// Allowed next states
    pub options: Vec<String>,
    /// The stimulus no guard matched
    pub stimulus: String,
}

impl DecisionPrompt {
    pub fn from_request(request: &DecisionRequest<'_>, history_window: usize) -> Self {
        let options: Vec<String> = request.targets().iter().map(|t| t.to_string()).collect();
        let system = format!(
            "You manage the conversation state of an agent currently in state '{}'. \
             Choose the next state from: {}. \
             Reply with JSON of the form {{\"next_state\": \"<state>\"}}.",
            request.current_state(),
            options.join(", ")
        );
        Self {
            system,
            current_state: request.current_state().to_string(),
            recent_history: request
                .snapshot
                .recent(history_window)
                .iter()
                .map(|entry| entry.state.clone())
                .collect(),
            options,
            stimulus: request.stimulus.to_string(),
        }
    }

    /// Render as plain text, for oracles that take a single string.
    pub fn render(&self) -> String {
        format!(
            "{}\nRecent states: {}\nInput: {}",
            self.system,
            self.recent_history.join(" -> "),
            self.stimulus
        )
    }
}

/// An external source of advice.
pub trait DecisionOracle: Send + Sync {
    fn suggest(&self, prompt: &DecisionPrompt) -> Result<Suggestion, OracleError>;
}

impl<F> DecisionOracle for F
where
    F: Fn(&DecisionPrompt) -> Result<Suggestion, OracleError> + Send + Sync,
{
    fn suggest(&self, prompt: &DecisionPrompt) -> Result<Suggestion, OracleError> {
        self(prompt)
    }
}

/// Oracle adapter settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// How many recent history entries go into the prompt
    pub history_window: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { history_window: 5 }
    }
}

/// [`DecisionFallback`] that asks a [`DecisionOracle`].
pub struct OracleFallback<O> {
    oracle: O,
    config: OracleConfig,
}

impl<O: DecisionOracle> OracleFallback<O> {
    pub fn new(oracle: O) -> Self {
        Self::with_config(oracle, OracleConfig::default())
    }

    pub fn with_config(oracle: O, config: OracleConfig) -> Self {
        Self { oracle, config }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

impl<O: DecisionOracle> DecisionFallback for OracleFallback<O> {
    fn decide(&self, request: &DecisionRequest<'_>) -> Option<Decision> {
        let prompt = DecisionPrompt::from_request(request, self.config.history_window);

        let suggestion = match self.oracle.suggest(&prompt) {
            Ok(suggestion) => suggestion,
            Err(err) => {
                warn!(state = %request.current_state(), error = %err, "oracle failed");
                return None;
            }
        };

        let options = request.targets();
        let Some(target) = suggestion.resolve(&options) else {
            debug!(state = %request.current_state(), ?suggestion, "oracle made no usable choice");
            return None;
        };

        let response = suggestion.raw().unwrap_or_default().to_string();
        Some(Decision::to(target).with_exchange(prompt.render(), response))
    }
}
