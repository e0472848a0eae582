//! Scenario 2: Onboarding
//!
//! Greeting, name and goal across three turns of one conversation. The
//! greeting and the introduction pass the relevance guardrail on its fast
//! path; the goal statement goes to the judge and comes back as a
//! `context_update` listing only `goal`.

use vitalis_contracts::error::VitalisResult;
use vitalis_core::OrchestratorConfig;
use vitalis_guardrails::GuardrailConfig;

use crate::{scenarios::turn, wellness_orchestrator};

pub async fn run_scenario(
    orchestrator_config: &OrchestratorConfig,
    guardrail_config: &GuardrailConfig,
) -> VitalisResult<()> {
    println!("=== Scenario 2: Onboarding ===");
    println!();

    let orchestrator = wellness_orchestrator(orchestrator_config.clone(), guardrail_config.clone())?;

    let first = turn(&orchestrator, None, "hello").await?;
    let id = first.result().conversation_id.clone();
    turn(&orchestrator, Some(&id), "My name is Ada").await?;
    let last = turn(&orchestrator, Some(&id), "I want to lose 5kg in 2 months").await?;

    if let Some(goal) = &last.result().context.goal {
        println!(
            "  Stored goal: {} / {} {} / {} (priority {})",
            goal.objective, goal.quantity, goal.metric, goal.duration, goal.priority
        );
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
