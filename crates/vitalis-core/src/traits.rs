//! Seam traits for the vitalis turn pipeline.
//!
//! - `AgentRunner`       opaque model runtime (untrusted, may do network I/O)
//! - `ConversationStore` per-conversation state persistence
//! - `Guardrail`         pre-invocation check on an incoming message
//! - `ContentJudge`      deeper content check a guardrail may escalate to
//! - `Tool`              named function an agent may call to mutate context
//!
//! The orchestrator wires them together. The runner is never invoked for a
//! turn whose guardrails tripped.

use async_trait::async_trait;
use serde_json::Value;

use vitalis_contracts::{
    context::SessionContext,
    conversation::{ConversationId, ConversationState, InputItem, RunOutput},
    error::VitalisResult,
    guardrail::{GuardrailVerdict, JudgeVerdict},
};

use crate::registry::AgentDescriptor;

/// The model runtime that executes one agent over a dialogue history.
///
/// Implementations own prompt construction, tool dispatch, and handoff
/// execution. Handoffs must go through `AgentRegistry::handoff` so that
/// only declared edges are followed and each edge's hook runs exactly once.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Run `agent` over `input`, mutating `context` through tools and hooks.
    ///
    /// Items may be returned in any order; the orchestrator tolerates it.
    async fn run(
        &self,
        agent: &AgentDescriptor,
        input: Vec<InputItem>,
        context: &mut SessionContext,
    ) -> VitalisResult<RunOutput>;
}

/// Key-value persistence of conversation state.
///
/// `save` has full-replace, last-write-wins semantics. Implementations are
/// not required to serialize concurrent turns for the same id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Return the stored state for `id`, or `None` if it was never saved.
    async fn get(&self, id: &ConversationId) -> VitalisResult<Option<ConversationState>>;

    /// Replace the stored state for `id`.
    async fn save(&self, id: &ConversationId, state: ConversationState) -> VitalisResult<()>;
}

/// A named check run against each message before the active agent sees it.
///
/// Guardrails are stateless and may be shared by several agents.
#[async_trait]
pub trait Guardrail: Send + Sync {
    /// Stable display name, reported in `GuardrailCheck::name`.
    fn name(&self) -> &str;

    /// Decide whether `message` may reach the agent.
    async fn check(&self, message: &str, context: &SessionContext) -> VitalisResult<GuardrailVerdict>;
}

/// What a guardrail asks its judge.
#[derive(Debug, Clone, Copy)]
pub struct JudgeRequest<'a> {
    /// Name of the guardrail asking.
    pub guardrail: &'a str,
    /// The question, phrased for a language model.
    pub instructions: &'a str,
    /// The raw user message.
    pub message: &'a str,
    pub context: &'a SessionContext,
}

/// A deeper content check, usually backed by the same model runtime as the
/// agents.
#[async_trait]
pub trait ContentJudge: Send + Sync {
    async fn judge(&self, request: JudgeRequest<'_>) -> VitalisResult<JudgeVerdict>;
}

/// A function an agent may call. Each tool writes only the context fields it
/// owns and returns a text description of what it did.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn invoke(&self, context: &mut SessionContext, args: &Value) -> VitalisResult<String>;
}
