//! # vitalis-ref-wellness
//!
//! Health and wellness reference roster for the Vitalis session router.
//!
//! Four agents in a star: the **Health & Wellness Planner** at the root, and
//! the **Nutrition Expert**, **Injury Support** and **Escalation** agents it
//! hands off to. Tools write to the session context; handoff hooks stamp the
//! handoff trail. A keyword judge and a scripted runner stand in for the
//! language model, so every scenario runs offline and deterministically.

pub mod agents;
pub mod hooks;
pub mod judge;
pub mod runner;
pub mod scenarios;
pub mod tools;

use std::sync::Arc;

use vitalis_contracts::error::VitalisResult;
use vitalis_core::{
    traits::{AgentRunner, ContentJudge, ConversationStore},
    OrchestratorConfig, TurnOrchestrator,
};
use vitalis_guardrails::GuardrailConfig;
use vitalis_store::InMemoryConversationStore;

use crate::{agents::build_registry, judge::KeywordJudge, runner::ScriptedRunner};

/// Wire the wellness roster into a ready-to-use orchestrator backed by an
/// in-memory store.
pub fn wellness_orchestrator(
    orchestrator: OrchestratorConfig,
    guardrails: GuardrailConfig,
) -> VitalisResult<TurnOrchestrator> {
    let guardrails = Arc::new(guardrails);
    let judge: Arc<dyn ContentJudge> = Arc::new(KeywordJudge);
    let registry = Arc::new(build_registry(Arc::clone(&guardrails), judge)?);
    let runner: Arc<dyn AgentRunner> =
        Arc::new(ScriptedRunner::new(Arc::clone(&registry), guardrails.greetings.clone()));
    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new());

    Ok(TurnOrchestrator::new(registry, runner, store, orchestrator))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vitalis_contracts::{
        event::EventKind,
        turn::{TurnOutcome, TurnRequest, TurnResponse},
    };
    use vitalis_core::config::DEFAULT_REFUSAL;
    use vitalis_guardrails::HEALTH_RELEVANCE;

    use super::*;
    use crate::agents::{INJURY_SUPPORT, NUTRITION_EXPERT, PLANNER, PLANNER_GREETING};

    fn orchestrator() -> TurnOrchestrator {
        wellness_orchestrator(OrchestratorConfig::default(), GuardrailConfig::default()).unwrap()
    }

    // ── Full conversations ──

    #[tokio::test]
    async fn onboarding_then_goal() {
        let orch = orchestrator();

        let start = orch.submit_turn(None, "").await.unwrap();
        assert!(matches!(start, TurnOutcome::Started(_)));
        let id = start.result().conversation_id.clone();
        assert_eq!(start.result().current_agent, PLANNER);
        assert_eq!(start.result().agents.len(), 4);

        let hello = orch.submit_turn(Some(id.as_str()), "hello").await.unwrap();
        assert_eq!(hello.result().messages[0].content, PLANNER_GREETING);

        let named = orch.submit_turn(Some(id.as_str()), "My name is Ada").await.unwrap();
        assert_eq!(named.result().context.name.as_deref(), Some("Ada"));

        let goal = orch
            .submit_turn(Some(id.as_str()), "I want to lose 5kg in 2 months")
            .await
            .unwrap();
        let result = goal.into_result();
        assert_eq!(result.conversation_id, id);
        let update = result
            .events
            .iter()
            .find(|e| e.kind == EventKind::ContextUpdate)
            .expect("goal turn emits a context update");
        let changed: Vec<&String> = update.metadata.as_ref().unwrap().keys().collect();
        assert_eq!(changed, vec!["goal"]);
        assert!(result.guardrails.iter().all(|g| g.passed));
    }

    #[tokio::test]
    async fn dietary_request_hands_off_and_sticks() {
        let orch = orchestrator();
        let id = orch
            .submit_turn(None, "My name is Ada")
            .await
            .unwrap()
            .result()
            .conversation_id
            .clone();

        let planned = orch
            .submit_turn(Some(id.as_str()), "Can you build me a vegetarian meal plan?")
            .await
            .unwrap()
            .into_result();
        assert_eq!(planned.current_agent, NUTRITION_EXPERT);
        assert!(planned
            .events
            .iter()
            .any(|e| e.kind == EventKind::Handoff && e.agent == PLANNER));
        assert_eq!(planned.context.diet_preferences.as_deref(), Some("vegetarian"));
        assert_eq!(planned.context.meal_plan.as_ref().map(Vec::len), Some(7));
        assert_eq!(planned.context.handoff_logs.len(), 1);

        let progress = orch
            .submit_turn(Some(id.as_str()), "I lost 1.5kg this week")
            .await
            .unwrap()
            .into_result();
        assert_eq!(progress.current_agent, NUTRITION_EXPERT);
        assert_eq!(progress.messages[0].agent, NUTRITION_EXPERT);
        assert_eq!(progress.context.progress_logs.len(), 1);

        let back = orch
            .submit_turn(Some(id.as_str()), "Take me back to the planner")
            .await
            .unwrap()
            .into_result();
        assert_eq!(back.current_agent, PLANNER);
    }

    #[tokio::test]
    async fn injury_keeps_restrictions_across_turns() {
        let orch = orchestrator();
        let id = orch
            .submit_turn(None, "Call me Sam")
            .await
            .unwrap()
            .result()
            .conversation_id
            .clone();

        let hurt = orch
            .submit_turn(Some(id.as_str()), "My knee hurts when I run")
            .await
            .unwrap()
            .into_result();
        assert_eq!(hurt.current_agent, INJURY_SUPPORT);
        assert_eq!(hurt.context.injury_notes.as_deref(), Some("My knee hurts when I run"));

        let follow_up = orch
            .submit_turn(Some(id.as_str()), "I'm an advanced lifter, what workout now?")
            .await
            .unwrap()
            .into_result();
        let plan = follow_up.context.workout_plan.unwrap();
        assert_eq!(plan.kind, "low_impact_strength_training");
        assert!(plan.avoid.contains(&"Squats".to_string()));
    }

    #[tokio::test]
    async fn off_topic_is_refused_without_side_effects() {
        let orch = orchestrator();
        let named = orch.submit_turn(None, "My name is Ada").await.unwrap().into_result();
        let id = named.conversation_id.clone();

        let refused = orch
            .submit_turn(Some(id.as_str()), "Which stock should I buy today?")
            .await
            .unwrap();
        match refused {
            TurnOutcome::Refused { result, guardrail } => {
                assert_eq!(guardrail, HEALTH_RELEVANCE);
                assert_eq!(result.messages.len(), 1);
                assert_eq!(result.messages[0].content, DEFAULT_REFUSAL);
                assert!(result.events.is_empty());
                assert_eq!(result.context, named.context);
                assert_eq!(result.current_agent, PLANNER);
                assert_eq!(result.guardrails.iter().filter(|g| !g.passed).count(), 1);
            }
            other => panic!("expected Refused, got {:?}", other),
        }

        let after = orch.submit_turn(Some(id.as_str()), "Help me gain 3kg of muscle in 3 months").await;
        assert!(matches!(after, Ok(TurnOutcome::Completed(_))));
    }

    #[tokio::test]
    async fn respond_maps_refusal_to_ok_body() {
        let orch = orchestrator();
        let response = orch
            .respond(TurnRequest {
                conversation_id: None,
                message: "Who won the football match?".to_string(),
            })
            .await;
        assert_eq!(response.status_code(), 200);
        match response {
            TurnResponse::Turn(result) => assert_eq!(result.messages[0].content, DEFAULT_REFUSAL),
            other => panic!("expected Turn, got {:?}", other),
        }
    }
}
