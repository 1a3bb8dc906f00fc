//! Named states and their payloads.
//!
//! A [`State`] pairs an immutable identity (`id`, `name`) with a mutable
//! [`StateContent`]: a free-form data map plus a [`Metadata`] record.
//! Transition actions only ever see the content, never the identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Process-unique state identifier.
///
/// Backed by a random v4 UUID, so an id is never handed out twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(Uuid);

impl StateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Auxiliary record attached to every state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Free-form annotations written by actions or hosts
    #[serde(default)]
    pub custom_data: HashMap<String, Value>,

    /// Embedding used by similarity search in external stores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Context sent to the decision oracle when it chose this state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_prompt: Option<String>,

    /// Raw oracle reply that led to this state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_response: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            custom_data: HashMap::new(),
            embedding: None,
            decision_prompt: None,
            decision_response: None,
        }
    }
}

impl Metadata {
    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The mutable part of a state.
///
/// Actions receive a staged copy of the current state's content; the copy
/// replaces the original only once the transition commits.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateContent {
    #[serde(default)]
    pub data: HashMap<String, Value>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl StateContent {
    /// Insert or replace a data entry and touch the metadata.
    pub fn update_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
        self.metadata.touch();
    }

    /// Insert or replace a `custom_data` annotation and touch the metadata.
    pub fn set_custom(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.custom_data.insert(key.into(), value.into());
        self.metadata.touch();
    }

    /// Record the oracle exchange that selected this state.
    pub fn annotate_decision(&mut self, prompt: Option<String>, response: Option<String>) {
        if prompt.is_none() && response.is_none() {
            return;
        }
        self.metadata.decision_prompt = prompt;
        self.metadata.decision_response = response;
        self.metadata.touch();
    }
}

/// A named node of the state graph.
///
/// `id` and `name` are fixed at construction. Everything else lives in
/// [`StateContent`] and may change as transitions fire.
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
/// use serde_json::json;
///
/// let state = State::new("Welcome").with_data("message", json!("Hello!"));
///
/// assert_eq!(state.name(), "Welcome");
/// assert_eq!(state.data()["message"], json!("Hello!"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    id: StateId,
    name: String,
    #[serde(flatten)]
    content: StateContent,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StateId::new(),
            name: name.into(),
            content: StateContent::default(),
        }
    }

    /// Rebuild a state with a known identity, e.g. when restoring a checkpoint.
    pub fn from_parts(id: StateId, name: impl Into<String>, content: StateContent) -> Self {
        Self {
            id,
            name: name.into(),
            content,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.data.insert(key.into(), value.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.content.metadata.embedding = Some(embedding);
        self
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &HashMap<String, Value> {
        &self.content.data
    }

    pub fn metadata(&self) -> &Metadata {
        &self.content.metadata
    }

    pub fn content(&self) -> &StateContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut StateContent {
        &mut self.content
    }

    pub(crate) fn replace_content(&mut self, content: StateContent) {
        self.content = content;
    }
}
