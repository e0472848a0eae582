//! Wellness demo scenarios.
//!
//! Each scenario wires a fresh orchestrator (keyword judge, scripted runner,
//! in-memory store) and drives one conversation through a distinct path of
//! the turn pipeline, printing what the client would receive.

pub mod injury_support;
pub mod nutrition_handoff;
pub mod off_topic;
pub mod onboarding;
pub mod session_start;

use vitalis_contracts::{
    conversation::ConversationId,
    error::VitalisResult,
    event::EventKind,
    turn::{TurnOutcome, TurnResult},
};
use vitalis_core::TurnOrchestrator;

/// Submit `message` and print the outcome. Returns the conversation id so
/// the next turn can continue the same conversation.
pub(crate) async fn turn(
    orchestrator: &TurnOrchestrator,
    conversation_id: Option<&ConversationId>,
    message: &str,
) -> VitalisResult<TurnOutcome> {
    let outcome = orchestrator
        .submit_turn(conversation_id.map(ConversationId::as_str), message)
        .await?;
    print_outcome(message, &outcome);
    Ok(outcome)
}

fn kind_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Message => "message",
        EventKind::Handoff => "handoff",
        EventKind::ToolCall => "tool_call",
        EventKind::ToolOutput => "tool_output",
        EventKind::ContextUpdate => "context_update",
    }
}

pub fn print_outcome(message: &str, outcome: &TurnOutcome) {
    let status = match outcome {
        TurnOutcome::Started(_) => "STARTED",
        TurnOutcome::Completed(_) => "COMPLETED",
        TurnOutcome::Refused { .. } => "REFUSED",
    };
    println!("  User:    {:?}", message);
    println!("  Outcome: {}", status);
    print_result(outcome.result());
    println!();
}

pub fn print_result(result: &TurnResult) {
    println!("  Agent:   {}", result.current_agent);
    for reply in &result.messages {
        println!("  [{}] {}", reply.agent, reply.content);
    }
    for event in &result.events {
        match &event.metadata {
            Some(meta) if event.kind == EventKind::ContextUpdate => {
                let fields: Vec<&str> = meta.keys().map(String::as_str).collect();
                println!("    - {:<14} {} changed: {}", kind_label(event.kind), event.agent, fields.join(", "));
            }
            _ => {
                let content = event.content.lines().next().unwrap_or("");
                println!("    - {:<14} {} {}", kind_label(event.kind), event.agent, content);
            }
        }
    }
    for check in &result.guardrails {
        println!(
            "    guardrail {:<28} {}",
            check.name,
            if check.passed { "PASS" } else { "FAIL" }
        );
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vitalis_contracts::turn::TurnOutcome;
    use vitalis_core::{OrchestratorConfig, UnknownConversationPolicy};
    use vitalis_guardrails::GuardrailConfig;

    use super::{injury_support, nutrition_handoff, off_topic, onboarding, session_start, turn};
    use crate::wellness_orchestrator;

    fn custom_config() -> (OrchestratorConfig, GuardrailConfig) {
        let orchestrator = OrchestratorConfig {
            refusal_message: "Let's keep this about your health.".to_string(),
            unknown_conversation: UnknownConversationPolicy::Reject,
            runner_timeout_ms: Some(5_000),
            ..OrchestratorConfig::default()
        };
        let guardrails = GuardrailConfig {
            greetings: vec!["hello".to_string(), "howdy".to_string()],
            ..GuardrailConfig::default()
        };
        (orchestrator, guardrails)
    }

    #[tokio::test]
    async fn every_scenario_runs_with_a_custom_config() {
        let (orchestrator, guardrails) = custom_config();
        session_start::run_scenario(&orchestrator, &guardrails).await.unwrap();
        onboarding::run_scenario(&orchestrator, &guardrails).await.unwrap();
        nutrition_handoff::run_scenario(&orchestrator, &guardrails).await.unwrap();
        injury_support::run_scenario(&orchestrator, &guardrails).await.unwrap();
        off_topic::run_scenario(&orchestrator, &guardrails).await.unwrap();
    }

    #[tokio::test]
    async fn configured_refusal_reaches_the_client() {
        let (orchestrator, guardrails) = custom_config();
        let orch = wellness_orchestrator(orchestrator, guardrails).unwrap();

        let first = turn(&orch, None, "My name is Ada").await.unwrap();
        let id = first.result().conversation_id.clone();
        match turn(&orch, Some(&id), "Which stock should I buy today?").await.unwrap() {
            TurnOutcome::Refused { result, .. } => {
                assert_eq!(result.messages[0].content, "Let's keep this about your health.");
            }
            other => panic!("expected Refused, got {:?}", other),
        }

        let unknown = vitalis_contracts::conversation::ConversationId::from("no-such-conversation");
        assert!(turn(&orch, Some(&unknown), "hello").await.is_err());
    }
}
