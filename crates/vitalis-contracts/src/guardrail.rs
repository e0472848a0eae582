//! Guardrail verdicts and the per-turn check records reported to the client.
//!
//! A guardrail produces a `GuardrailVerdict` for an incoming message. Any
//! verdict with `tripwire_triggered = true` stops the turn before the agent
//! runs; everything else lets it proceed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The decision one guardrail reached about one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    /// True when the message must be rejected.
    pub tripwire_triggered: bool,
    /// Short explanation, surfaced to the client on rejection.
    pub reasoning: String,
    /// Optional structured detail (e.g. a parsed goal). Informational only.
    pub output_info: Option<Value>,
}

impl GuardrailVerdict {
    /// A passing verdict.
    pub fn allow(reasoning: impl Into<String>) -> Self {
        Self {
            tripwire_triggered: false,
            reasoning: reasoning.into(),
            output_info: None,
        }
    }

    /// A rejecting verdict.
    pub fn trip(reasoning: impl Into<String>) -> Self {
        Self {
            tripwire_triggered: true,
            reasoning: reasoning.into(),
            output_info: None,
        }
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.output_info = Some(info);
        self
    }
}

/// The structured answer a content judge gives to a guardrail's question.
///
/// `accepted` carries `is_relevant` for relevance checks and `is_valid` for
/// goal validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub reasoning: String,
    pub accepted: bool,
    pub detail: Option<Value>,
}

/// One guardrail's status as reported in a turn response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailCheck {
    pub id: String,
    pub name: String,
    /// The raw user message the guardrail looked at.
    pub input: String,
    pub reasoning: String,
    pub passed: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl GuardrailCheck {
    pub fn new(
        name: impl Into<String>,
        input: impl Into<String>,
        reasoning: impl Into<String>,
        passed: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: name.into(),
            input: input.into(),
            reasoning: reasoning.into(),
            passed,
            timestamp,
        }
    }
}
