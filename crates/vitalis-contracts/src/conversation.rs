//! Conversation identity, stored state, and the agent-runner boundary types.
//!
//! `RunItem` is the closed set of output kinds a runner may produce. The
//! orchestrator switches on it exhaustively; no other item kinds exist.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::SessionContext;

/// Opaque token naming one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Allocate a fresh id (32 lowercase hex characters).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who authored an entry in the input history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// One entry of the dialogue history handed to the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputItem {
    pub role: Role,
    pub content: String,
}

impl InputItem {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self { role: Role::Tool, content: content.into() }
    }
}

/// Everything persisted for one conversation between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Full dialogue history as last returned by the runner.
    pub input_items: Vec<InputItem>,
    /// The accumulated session facts.
    pub context: SessionContext,
    /// Name of the agent that will receive the next message.
    pub current_agent: String,
}

impl ConversationState {
    /// A fresh state with empty history, owned by `root_agent`.
    pub fn new(context: SessionContext, root_agent: impl Into<String>) -> Self {
        Self {
            input_items: Vec::new(),
            context,
            current_agent: root_agent.into(),
        }
    }
}

/// One item produced by the agent runner during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunItem {
    /// Plain text addressed to the user.
    Message { agent: String, content: String },
    /// Control moved from one agent to another.
    Handoff { source_agent: String, target_agent: String },
    /// The agent invoked a tool. `arguments` is usually a JSON-encoded
    /// string exactly as the model emitted it.
    ToolCall { agent: String, tool: String, arguments: Value },
    /// The text a tool returned.
    ToolOutput { agent: String, output: String },
}

/// What the runner returns for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Items in the order the runner produced them.
    pub new_items: Vec<RunItem>,
    /// The input history updated with everything from this run.
    pub input_items: Vec<InputItem>,
}
