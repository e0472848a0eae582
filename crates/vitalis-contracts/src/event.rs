//! The per-turn event trail and message list returned to the client UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminant for `AgentEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    Handoff,
    ToolCall,
    ToolOutput,
    ContextUpdate,
}

/// One entry in a turn's event trail. Never persisted beyond the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// The agent the event is attributed to.
    pub agent: String,
    pub content: String,
    pub metadata: Option<Map<String, Value>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl AgentEvent {
    /// Build an event with a fresh id and the current time.
    pub fn new(kind: EventKind, agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            kind,
            agent: agent.into(),
            content: content.into(),
            metadata: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A message shown in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub content: String,
    pub agent: String,
}

impl MessageResponse {
    pub fn new(content: impl Into<String>, agent: impl Into<String>) -> Self {
        Self { content: content.into(), agent: agent.into() }
    }
}
