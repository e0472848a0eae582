//! The four wellness agents and the star-shaped graph connecting them.
//!
//! The planner is the root. It hands off to one of three specialists, and
//! each specialist can only hand back to the planner.

use std::sync::Arc;

use vitalis_contracts::{context::SessionContext, error::VitalisResult};
use vitalis_core::{
    registry::{AgentDescriptor, AgentRegistry, HandoffEdge},
    traits::{ContentJudge, Guardrail, Tool},
};
use vitalis_guardrails::{GoalValidationGuardrail, GuardrailConfig, HealthRelevanceGuardrail};

use crate::{
    hooks::{ESCALATION_HANDOFF, INJURY_HANDOFF, NUTRITION_HANDOFF},
    tools::{
        CheckinScheduler, GoalAnalyzer, MealPlanner, ProgressTracker, SetUserName, WorkoutRecommender,
        WorkoutSelector,
    },
};

pub const PLANNER: &str = "Health & Wellness Planner";
pub const NUTRITION_EXPERT: &str = "Nutrition Expert Agent";
pub const INJURY_SUPPORT: &str = "Injury Support Agent";
pub const ESCALATION: &str = "Escalation Agent";

/// What the planner says to a greeting before it knows the user's name.
pub const PLANNER_GREETING: &str = "Hello! I'm your Health & Wellness Planner Agent. \
I'll help you set and achieve your health and fitness goals. Let's get started! What's your name?";

// ── Instructions ─────────────────────────────────────────────────────────────

/// The planner asks for a name, then a goal, then works from a summary of
/// everything known so far.
pub fn planner_instructions(ctx: &SessionContext) -> String {
    let Some(name) = ctx.name.as_deref() else {
        return "Welcome! What's your name?".to_string();
    };
    let Some(goal) = ctx.goal.as_ref() else {
        return format!(
            "Hi {}! What is your main fitness or health goal? \
             (e.g., lose 5kg in 2 months, run a 5k, build muscle, etc.)",
            name
        );
    };

    let mut facts = vec![format!(
        "Goal: {} - {} {} in {}",
        goal.objective, goal.quantity, goal.metric, goal.duration
    )];
    if let Some(diet) = &ctx.diet_preferences {
        facts.push(format!("Dietary preferences: {}", diet));
    }
    if let Some(notes) = &ctx.injury_notes {
        facts.push(format!("Injury considerations: {}", notes));
    }
    if let Some(plan) = &ctx.workout_plan {
        facts.push(format!("Current workout plan: {} - {}", plan.kind, plan.frequency));
    }
    if let Some(meals) = &ctx.meal_plan {
        facts.push(format!("Meal plan: {} days planned", meals.len()));
    }

    format!(
        "You are a Health & Wellness Planner Agent for {name}.\n\n\
         Current Context:\n{facts}\n\n\
         Help {name} set and reach health goals with personalized meal and workout plans. \
         Hand off dietary needs to the Nutrition Expert, injuries or pain to Injury Support, \
         and requests for a human trainer to Escalation.",
        name = name,
        facts = facts.join("\n"),
    )
}

pub fn nutrition_instructions(ctx: &SessionContext) -> String {
    format!(
        "You are a Nutrition Expert helping with dietary plans for {} needs.",
        ctx.diet_preferences.as_deref().unwrap_or("general")
    )
}

pub fn injury_instructions(ctx: &SessionContext) -> String {
    format!(
        "You are an Injury Support Agent. Notes: {}",
        ctx.injury_notes.as_deref().unwrap_or("none")
    )
}

pub fn escalation_instructions(ctx: &SessionContext) -> String {
    format!(
        "You handle escalations to human trainers for {}.",
        ctx.name.as_deref().unwrap_or("the user")
    )
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Build the wellness roster. Guardrails consult `judge` for anything the
/// fast path does not settle.
///
/// # Errors
///
/// `ConfigError` if the roster does not form a valid star (only possible if
/// the names above are edited inconsistently).
pub fn build_registry(
    guardrails: Arc<GuardrailConfig>,
    judge: Arc<dyn ContentJudge>,
) -> VitalisResult<AgentRegistry> {
    let relevance: Arc<dyn Guardrail> = Arc::new(HealthRelevanceGuardrail::new(
        Arc::clone(&guardrails),
        Arc::clone(&judge),
    ));
    let goal_validation: Arc<dyn Guardrail> =
        Arc::new(GoalValidationGuardrail::new(Arc::clone(&guardrails), judge));
    let progress: Arc<dyn Tool> = Arc::new(ProgressTracker);

    let planner = AgentDescriptor::new(PLANNER, "gpt-4o", planner_instructions)
        .with_description("Helps users with goal setting, meal plans, workouts, and tracking.")
        .with_tool(Arc::new(SetUserName::new(guardrails.greetings.clone())))
        .with_tool(Arc::new(GoalAnalyzer))
        .with_tool(Arc::new(CheckinScheduler))
        .with_tool(Arc::clone(&progress))
        .with_tool(Arc::new(WorkoutSelector))
        .with_guardrail(goal_validation)
        .with_guardrail(Arc::clone(&relevance))
        .with_handoff(HandoffEdge::to(NUTRITION_EXPERT).with_hook(NUTRITION_HANDOFF))
        .with_handoff(HandoffEdge::to(INJURY_SUPPORT).with_hook(INJURY_HANDOFF))
        .with_handoff(HandoffEdge::to(ESCALATION).with_hook(ESCALATION_HANDOFF));

    let nutrition = AgentDescriptor::new(NUTRITION_EXPERT, "gpt-4.1", nutrition_instructions)
        .with_description("Helps with complex dietary needs.")
        .with_tool(Arc::new(MealPlanner))
        .with_tool(Arc::clone(&progress))
        .with_guardrail(Arc::clone(&relevance))
        .with_handoff(HandoffEdge::to(PLANNER));

    let injury = AgentDescriptor::new(INJURY_SUPPORT, "gpt-4.1", injury_instructions)
        .with_description("Supports injury recovery and exercise modifications.")
        .with_tool(Arc::new(WorkoutRecommender))
        .with_tool(Arc::clone(&progress))
        .with_guardrail(Arc::clone(&relevance))
        .with_handoff(HandoffEdge::to(PLANNER));

    let escalation = AgentDescriptor::new(ESCALATION, "gpt-4.1", escalation_instructions)
        .with_description("Handles human coach requests.")
        .with_tool(progress)
        .with_guardrail(relevance)
        .with_handoff(HandoffEdge::to(PLANNER));

    AgentRegistry::new(PLANNER, vec![planner, nutrition, injury, escalation])
}

// ── Tests ────────────────────────────────────────────────────────────────────
