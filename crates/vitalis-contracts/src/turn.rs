//! Turn request/response shapes.
//!
//! `TurnOutcome` is what the orchestrator returns to in-process callers.
//! `TurnResponse` is the flattened form handed to a transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    context::SessionContext,
    conversation::ConversationId,
    event::{AgentEvent, MessageResponse},
    guardrail::GuardrailCheck,
};

/// An inbound user message, optionally tied to an existing conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub message: String,
}

/// Static description of one agent in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    pub description: String,
    /// Names of the agents this one may hand off to.
    pub handoffs: Vec<String>,
    pub tools: Vec<String>,
    pub input_guardrails: Vec<String>,
}

/// Everything the client needs after one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub conversation_id: ConversationId,
    pub current_agent: String,
    pub messages: Vec<MessageResponse>,
    pub events: Vec<AgentEvent>,
    pub context: SessionContext,
    pub agents: Vec<AgentSummary>,
    pub guardrails: Vec<GuardrailCheck>,
}

/// How a turn ended.
///
/// - `Started` → empty message; a session was opened or echoed, no agent ran
/// - `Completed` → the agent ran and its output was recorded
/// - `Refused` → a guardrail tripped; the result carries the refusal text
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    Started(TurnResult),
    Completed(TurnResult),
    Refused {
        result: TurnResult,
        /// Name of the guardrail that tripped.
        guardrail: String,
    },
}

impl TurnOutcome {
    pub fn result(&self) -> &TurnResult {
        match self {
            TurnOutcome::Started(result)
            | TurnOutcome::Completed(result)
            | TurnOutcome::Refused { result, .. } => result,
        }
    }

    pub fn into_result(self) -> TurnResult {
        match self {
            TurnOutcome::Started(result)
            | TurnOutcome::Completed(result)
            | TurnOutcome::Refused { result, .. } => result,
        }
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, TurnOutcome::Refused { .. })
    }
}

/// The body a transport layer should send back.
///
/// Refusals are ordinary `Turn` bodies; only unexpected errors become
/// `Failure`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnResponse {
    Turn(Box<TurnResult>),
    Failure { error: String },
}

impl TurnResponse {
    /// HTTP-style status code for this body.
    pub fn status_code(&self) -> u16 {
        match self {
            TurnResponse::Turn(_) => 200,
            TurnResponse::Failure { .. } => 500,
        }
    }
}

/// Liveness probe answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self { status: "healthy".to_string(), timestamp: Utc::now() }
    }
}
