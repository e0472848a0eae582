//! Scenario 3: Nutrition Handoff
//!
//! A dietary request moves control from the planner to the Nutrition Expert.
//! The handoff hook stamps the trail, the meal planner writes a seven-day
//! plan, the next turn goes straight to the specialist, and a request for
//! the planner hands control back.

use vitalis_contracts::error::VitalisResult;
use vitalis_core::OrchestratorConfig;
use vitalis_guardrails::GuardrailConfig;

use crate::{scenarios::turn, wellness_orchestrator};

pub async fn run_scenario(
    orchestrator_config: &OrchestratorConfig,
    guardrail_config: &GuardrailConfig,
) -> VitalisResult<()> {
    println!("=== Scenario 3: Nutrition Handoff ===");
    println!();

    let orchestrator = wellness_orchestrator(orchestrator_config.clone(), guardrail_config.clone())?;

    let first = turn(&orchestrator, None, "My name is Ada").await?;
    let id = first.result().conversation_id.clone();
    turn(&orchestrator, Some(&id), "I want to lose 5kg in 2 months").await?;
    let planned = turn(&orchestrator, Some(&id), "Can you build me a vegetarian meal plan?").await?;
    turn(&orchestrator, Some(&id), "I lost 1.5kg this week").await?;
    let back = turn(&orchestrator, Some(&id), "Take me to the planner please").await?;

    let ctx = &planned.result().context;
    println!("  Diet preference: {}", ctx.diet_preferences.as_deref().unwrap_or("-"));
    println!("  Meal plan days:  {}", ctx.meal_plan.as_ref().map_or(0, Vec::len));
    println!("  Handoff trail:   {} entr(ies)", back.result().context.handoff_logs.len());
    println!("  Active agent:    {}", back.result().current_agent);
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
