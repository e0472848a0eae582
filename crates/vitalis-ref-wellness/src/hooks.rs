//! Handoff hooks for the specialist edges.
//!
//! Each hook stamps the handoff trail and may seed a default the target
//! agent relies on. Hooks never overwrite a value the user already gave.

use chrono::Utc;

use vitalis_contracts::context::SessionContext;
use vitalis_core::registry::HandoffHook;

pub const NUTRITION_HANDOFF: HandoffHook = HandoffHook::new("on_nutrition_expert_handoff", on_nutrition_expert);
pub const INJURY_HANDOFF: HandoffHook = HandoffHook::new("on_injury_support_handoff", on_injury_support);
pub const ESCALATION_HANDOFF: HandoffHook = HandoffHook::new("on_escalation_handoff", on_escalation);

fn on_nutrition_expert(context: &mut SessionContext) {
    context.record_handoff(format!("Handed off to Nutrition Expert at {}", Utc::now().to_rfc3339()));
    if context.diet_preferences.is_none() {
        context.diet_preferences = Some("general".to_string());
    }
}

fn on_injury_support(context: &mut SessionContext) {
    context.record_handoff(format!("Handed off to Injury Support at {}", Utc::now().to_rfc3339()));
    if context.injury_notes.is_none() {
        context.injury_notes = Some("No specific injury noted".to_string());
    }
}

fn on_escalation(context: &mut SessionContext) {
    context.record_handoff(format!("Escalated to human coach at {}", Utc::now().to_rfc3339()));
}
