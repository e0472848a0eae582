//! Scenario 1: Session Start
//!
//! The client opens a conversation with an empty message. No agent runs and
//! no guardrail is consulted; the response carries a fresh conversation id,
//! the root agent, an empty context and the full agent roster.

use vitalis_contracts::error::VitalisResult;
use vitalis_core::OrchestratorConfig;
use vitalis_guardrails::GuardrailConfig;

use crate::{scenarios::turn, wellness_orchestrator};

pub async fn run_scenario(
    orchestrator_config: &OrchestratorConfig,
    guardrail_config: &GuardrailConfig,
) -> VitalisResult<()> {
    println!("=== Scenario 1: Session Start ===");
    println!();

    let orchestrator = wellness_orchestrator(orchestrator_config.clone(), guardrail_config.clone())?;
    let outcome = turn(&orchestrator, None, "").await?;
    let result = outcome.result();

    println!("  Conversation id: {}", result.conversation_id);
    println!("  Session uid:     {}", result.context.uid);
    println!("  Roster:");
    for agent in &result.agents {
        println!(
            "    {:<28} handoffs: [{}]  tools: {}",
            agent.name,
            agent.handoffs.join(", "),
            agent.tools.len()
        );
    }
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
