//! Scenario 4: Injury Support
//!
//! Mentioning knee pain hands off to Injury Support. The hook seeds a
//! placeholder note, the workout recommender replaces it with the user's own
//! words and picks the knee-friendly plan. A follow-up workout question stays
//! with the specialist and keeps the restriction.

use vitalis_contracts::error::VitalisResult;
use vitalis_core::OrchestratorConfig;
use vitalis_guardrails::GuardrailConfig;

use crate::{scenarios::turn, wellness_orchestrator};

pub async fn run_scenario(
    orchestrator_config: &OrchestratorConfig,
    guardrail_config: &GuardrailConfig,
) -> VitalisResult<()> {
    println!("=== Scenario 4: Injury Support ===");
    println!();

    let orchestrator = wellness_orchestrator(orchestrator_config.clone(), guardrail_config.clone())?;

    let first = turn(&orchestrator, None, "Call me Sam").await?;
    let id = first.result().conversation_id.clone();
    turn(&orchestrator, Some(&id), "My knee hurts when I run").await?;
    let follow_up = turn(&orchestrator, Some(&id), "I'm an advanced lifter, what workout now?").await?;

    let ctx = &follow_up.result().context;
    println!("  Injury notes: {}", ctx.injury_notes.as_deref().unwrap_or("-"));
    if let Some(plan) = &ctx.workout_plan {
        println!("  Plan:         {} ({}, {})", plan.kind, plan.frequency, plan.duration);
        println!("  Avoid:        {}", plan.avoid.join(", "));
    }
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
