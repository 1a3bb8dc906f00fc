//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the resolution engine.
///
/// Deserializable so hosts can keep it alongside their own settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Consult the decision fallback when no guard matches
    pub consult_fallback: bool,

    /// Copy the fallback's prompt/response into the metadata of the state it picked
    pub annotate_decisions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            consult_fallback: true,
            annotate_decisions: true,
        }
    }
}
