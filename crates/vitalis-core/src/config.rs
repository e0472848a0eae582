//! Orchestrator settings, deserializable from the `[orchestrator]` table of
//! a TOML config file. Every field has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed text returned when a guardrail rejects a message.
pub const DEFAULT_REFUSAL: &str =
    "Sorry, I can only answer questions related to health, fitness, and wellness topics.";

/// What to do when a client supplies a conversation id with no stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownConversationPolicy {
    /// Allocate a new id and start over.
    #[default]
    StartNew,
    /// Fail the turn with `UnknownConversation`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub refusal_message: String,
    pub unknown_conversation: UnknownConversationPolicy,
    /// Tool name that asks the client to show its workout picker.
    pub workout_selector_tool: String,
    /// Message content the client recognizes as that request.
    pub workout_selector_sentinel: String,
    /// Upper bound on one runner invocation. `None` leaves it to the caller.
    pub runner_timeout_ms: Option<u64>,
}

impl OrchestratorConfig {
    pub fn runner_timeout(&self) -> Option<Duration> {
        self.runner_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            refusal_message: DEFAULT_REFUSAL.to_string(),
            unknown_conversation: UnknownConversationPolicy::StartNew,
            workout_selector_tool: "display_workout_selector".to_string(),
            workout_selector_sentinel: "DISPLAY_WORKOUT_SELECTOR".to_string(),
            runner_timeout_ms: None,
        }
    }
}
