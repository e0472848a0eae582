//! Scenario 5: Off-Topic Refusal
//!
//! A question about stocks trips the health relevance guardrail. The agent
//! never runs: the response holds only the fixed refusal, no events, and a
//! guardrail report with exactly one failure. Context and active agent are
//! unchanged, and the conversation carries on normally afterwards.

use vitalis_contracts::error::VitalisResult;
use vitalis_core::OrchestratorConfig;
use vitalis_guardrails::GuardrailConfig;

use crate::{scenarios::turn, wellness_orchestrator};

pub async fn run_scenario(
    orchestrator_config: &OrchestratorConfig,
    guardrail_config: &GuardrailConfig,
) -> VitalisResult<()> {
    println!("=== Scenario 5: Off-Topic Refusal ===");
    println!();

    let orchestrator = wellness_orchestrator(orchestrator_config.clone(), guardrail_config.clone())?;

    let first = turn(&orchestrator, None, "My name is Ada").await?;
    let id = first.result().conversation_id.clone();
    let refused = turn(&orchestrator, Some(&id), "Which stock should I buy today?").await?;
    turn(&orchestrator, Some(&id), "Okay, then help me gain 3kg of muscle in 3 months").await?;

    let failed: Vec<&str> = refused
        .result()
        .guardrails
        .iter()
        .filter(|g| !g.passed)
        .map(|g| g.name.as_str())
        .collect();
    println!("  Refused by:      {}", failed.join(", "));
    println!("  Context changed: {}", refused.result().context != first.result().context);
    println!();
    println!("  Scenario 5 complete.");
    println!();

    Ok(())
}
