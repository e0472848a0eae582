//! `ScriptedRunner`: a deterministic, keyword-driven agent runtime.
//!
//! It plays the part a language model would: reads the latest user message,
//! decides which tools to call and whether to hand off, and replies. Tools
//! run for real against the session context, and handoffs go through the
//! registry so hooks fire exactly as they would with a live model.
//!
//! A handoff passes the same message to the target agent, which answers it
//! within the same run. The target does not hand off again.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use vitalis_contracts::{
    context::SessionContext,
    conversation::{InputItem, Role, RunItem, RunOutput},
    error::{VitalisError, VitalisResult},
};
use vitalis_core::{
    registry::{AgentDescriptor, AgentRegistry},
    traits::AgentRunner,
};

use crate::{
    agents::{
        planner_instructions, ESCALATION, INJURY_SUPPORT, NUTRITION_EXPERT, PLANNER, PLANNER_GREETING,
    },
    tools::{
        analyze_goal, opens_with_greeting, DietKind, CHECKIN_SCHEDULER, GOAL_ANALYZER,
        MEAL_PLANNER, PROGRESS_TRACKER, SET_USER_NAME, WORKOUT_RECOMMENDER, WORKOUT_SELECTOR,
    },
};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid number regex"));

const INJURY_TERMS: &[&str] = &["injur", "pain", "hurt", "sore", "sprain", "knee", "back"];
const NUTRITION_TERMS: &[&str] = &[
    "diet", "meal", "vegetarian", "vegan", "keto", "low-carb", "diabet", "nutrition", "eat",
];
const ESCALATION_TERMS: &[&str] = &["human", "real coach", "trainer", "escalat"];
const WORKOUT_TERMS: &[&str] = &["workout", "exercise", "training plan"];
const CHECKIN_TERMS: &[&str] = &["check-in", "checkin", "check in"];
const PROGRESS_TERMS: &[&str] = &["lost", "gained", "progress", "ran ", "walked"];
const GOAL_TERMS: &[&str] = &["lose", "gain", "muscle", "run a", "goal", "tone", "stronger"];
const RETURN_TERMS: &[&str] = &["planner", "main menu", "go back"];

const NAME_PREFIXES: &[&str] = &["my name is ", "call me ", "i am ", "i'm ", "i\u{2019}m ", "im ", "it's "];
// Words that follow "i am" but are not names.
const NOT_NAMES: &[&str] = &[
    "a", "an", "the", "not", "so", "very", "here", "trying", "looking", "going", "new",
    "interested", "feeling", "just", "really",
];

fn mentions(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// Pull a name out of an introduction like "My name is Ada".
fn extract_name(message: &str) -> Option<String> {
    let trimmed = message.trim();
    let rest = NAME_PREFIXES.iter().find_map(|prefix| {
        trimmed
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| &trimmed[prefix.len()..])
    })?;

    let word = rest
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'');
    if word.is_empty() || NOT_NAMES.contains(&word.to_lowercase().as_str()) {
        return None;
    }
    Some(word.to_string())
}

fn first_number(text: &str) -> Option<f64> {
    NUMBER_RE.captures(text).and_then(|c| c[1].parse().ok())
}

/// Keyword-driven stand-in for a model runtime.
pub struct ScriptedRunner {
    registry: Arc<AgentRegistry>,
    greetings: Vec<String>,
}

impl ScriptedRunner {
    pub fn new(registry: Arc<AgentRegistry>, greetings: Vec<String>) -> Self {
        Self { registry, greetings }
    }

    fn is_greeting(&self, lower: &str) -> bool {
        opens_with_greeting(lower, &self.greetings)
    }

    // ── Item helpers ─────────────────────────────────────────────────────────

    fn say(agent: &AgentDescriptor, content: impl Into<String>, items: &mut Vec<RunItem>) {
        items.push(RunItem::Message { agent: agent.name.clone(), content: content.into() });
    }

    /// Invoke one of `agent`'s tools and record the call and its output.
    fn call(
        agent: &AgentDescriptor,
        tool: &str,
        args: Value,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
    ) -> VitalisResult<String> {
        let handle = agent.find_tool(tool).ok_or_else(|| VitalisError::ToolFailed {
            tool: tool.to_string(),
            reason: format!("not available to '{}'", agent.name),
        })?;

        items.push(RunItem::ToolCall {
            agent: agent.name.clone(),
            tool: tool.to_string(),
            arguments: Value::String(args.to_string()),
        });
        let output = handle.invoke(context, &args)?;
        debug!(agent = %agent.name, tool = %tool, "tool invoked");
        items.push(RunItem::ToolOutput { agent: agent.name.clone(), output: output.clone() });
        Ok(output)
    }

    fn hand_off(
        &self,
        from: &AgentDescriptor,
        to: &str,
        message: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
    ) -> VitalisResult<()> {
        let target = self.registry.handoff(&from.name, to, context)?;
        items.push(RunItem::Handoff {
            source_agent: from.name.clone(),
            target_agent: target.name.clone(),
        });
        self.respond(target, message, context, items, false)
    }

    // ── Agent behaviour ──────────────────────────────────────────────────────

    fn respond(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
        may_hand_off: bool,
    ) -> VitalisResult<()> {
        let lower = message.trim().to_lowercase();
        match agent.name.as_str() {
            PLANNER => self.plan(agent, message, &lower, context, items, may_hand_off),
            NUTRITION_EXPERT => self.advise_nutrition(agent, message, &lower, context, items, may_hand_off),
            INJURY_SUPPORT => self.support_injury(agent, message, &lower, context, items, may_hand_off),
            ESCALATION => self.escalate(agent, message, &lower, context, items, may_hand_off),
            _ => {
                Self::say(agent, agent.instructions_for(context), items);
                Ok(())
            }
        }
    }

    fn plan(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        lower: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
        may_hand_off: bool,
    ) -> VitalisResult<()> {
        // Onboarding: nothing else happens until we have a name.
        if context.name.is_none() {
            if let Some(name) = extract_name(message) {
                let output = Self::call(agent, SET_USER_NAME, json!({ "name": name }), context, items)?;
                let reply = if context.name.is_some() { planner_instructions(context) } else { output };
                Self::say(agent, reply, items);
            } else if self.is_greeting(lower) {
                Self::say(agent, PLANNER_GREETING, items);
            } else {
                Self::say(agent, planner_instructions(context), items);
            }
            return Ok(());
        }

        if may_hand_off {
            let target = if mentions(lower, INJURY_TERMS) {
                Some(INJURY_SUPPORT)
            } else if mentions(lower, NUTRITION_TERMS) {
                Some(NUTRITION_EXPERT)
            } else if mentions(lower, ESCALATION_TERMS) {
                Some(ESCALATION)
            } else {
                None
            };
            if let Some(target) = target {
                return self.hand_off(agent, target, message, context, items);
            }
        }

        let name = context.name.clone().unwrap_or_default();

        if mentions(lower, WORKOUT_TERMS) {
            Self::call(agent, WORKOUT_SELECTOR, json!({}), context, items)?;
            Self::say(agent, "Pick the kind of workout you'd like and I'll tailor a plan around it.", items);
        } else if mentions(lower, CHECKIN_TERMS) {
            let output = Self::call(agent, CHECKIN_SCHEDULER, json!({}), context, items)?;
            Self::say(agent, format!("{}. I'll ask how things are going then, {}.", output, name), items);
        } else if mentions(lower, PROGRESS_TERMS) {
            self.track_progress(agent, message, lower, context, items)?;
            Self::say(agent, format!("Nice work, {}! I've logged that.", name), items);
        } else if mentions(lower, GOAL_TERMS) || (context.goal.is_none() && first_number(lower).is_some()) {
            Self::call(agent, GOAL_ANALYZER, json!({ "user_goal": message }), context, items)?;
            let goal = analyze_goal(message);
            Self::say(
                agent,
                format!(
                    "Great, {}! Your goal is {}: {} {} in {}. Would you like a meal plan or a workout plan next?",
                    name, goal.objective, goal.quantity, goal.metric, goal.duration
                ),
                items,
            );
        } else if context.goal.is_none() {
            Self::say(agent, planner_instructions(context), items);
        } else {
            Self::say(
                agent,
                format!(
                    "Thanks, {}. Ask me for a meal plan, a workout, or a weekly check-in whenever you're ready.",
                    name
                ),
                items,
            );
        }
        Ok(())
    }

    fn advise_nutrition(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        lower: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
        may_hand_off: bool,
    ) -> VitalisResult<()> {
        if may_hand_off && mentions(lower, RETURN_TERMS) {
            return self.hand_off(agent, PLANNER, message, context, items);
        }
        if mentions(lower, PROGRESS_TERMS) {
            self.track_progress(agent, message, lower, context, items)?;
            Self::say(agent, "Logged. Keep the meals consistent and the numbers will follow.", items);
            return Ok(());
        }

        let preferences = match DietKind::detect(lower) {
            DietKind::Diabetic => "diabetic".to_string(),
            DietKind::Vegetarian => "vegetarian".to_string(),
            DietKind::Keto => "keto".to_string(),
            DietKind::Balanced => context.diet_preferences.clone().unwrap_or_else(|| "general".to_string()),
        };
        Self::call(agent, MEAL_PLANNER, json!({ "dietary_preferences": preferences }), context, items)?;

        let label = DietKind::detect(&preferences).label();
        let first = context
            .meal_plan
            .as_ref()
            .and_then(|plan| plan.first())
            .cloned()
            .unwrap_or_default();
        Self::say(
            agent,
            format!("Here's a 7-day {} meal plan to start with. {}. Ask me to swap any day.", label, first),
            items,
        );
        Ok(())
    }

    fn support_injury(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        lower: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
        may_hand_off: bool,
    ) -> VitalisResult<()> {
        if may_hand_off && mentions(lower, RETURN_TERMS) {
            return self.hand_off(agent, PLANNER, message, context, items);
        }
        if mentions(lower, PROGRESS_TERMS) {
            self.track_progress(agent, message, lower, context, items)?;
            Self::say(agent, "Logged. Stop if the pain comes back.", items);
            return Ok(());
        }

        let level = ["beginner", "advanced", "intermediate"]
            .into_iter()
            .find(|level| lower.contains(level))
            .unwrap_or("beginner");
        let mut args = json!({ "experience_level": level });
        if mentions(lower, INJURY_TERMS) {
            args["injury_notes"] = Value::String(message.trim().to_string());
        }
        Self::call(agent, WORKOUT_RECOMMENDER, args, context, items)?;

        let reply = match &context.workout_plan {
            Some(plan) if !plan.avoid.is_empty() => format!(
                "Here's a {} plan, {}, {} per session. Please avoid: {}.",
                plan.kind.replace('_', " "),
                plan.frequency,
                plan.duration,
                plan.avoid.join(", ")
            ),
            Some(plan) => format!(
                "Here's a {} plan, {}, {} per session.",
                plan.kind.replace('_', " "),
                plan.frequency,
                plan.duration
            ),
            None => agent.instructions_for(context),
        };
        Self::say(agent, reply, items);
        Ok(())
    }

    fn escalate(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        lower: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
        may_hand_off: bool,
    ) -> VitalisResult<()> {
        if may_hand_off && mentions(lower, RETURN_TERMS) {
            return self.hand_off(agent, PLANNER, message, context, items);
        }
        if mentions(lower, PROGRESS_TERMS) {
            self.track_progress(agent, message, lower, context, items)?;
        }
        Self::say(
            agent,
            format!(
                "I've passed your request to a human coach, {}. They'll reach out within one business day.",
                context.name.as_deref().unwrap_or("friend")
            ),
            items,
        );
        Ok(())
    }

    fn track_progress(
        &self,
        agent: &AgentDescriptor,
        message: &str,
        lower: &str,
        context: &mut SessionContext,
        items: &mut Vec<RunItem>,
    ) -> VitalisResult<String> {
        let value = first_number(lower).unwrap_or(0.0);
        Self::call(
            agent,
            PROGRESS_TRACKER,
            json!({ "progress_update": message.trim(), "metric_value": value }),
            context,
            items,
        )
    }
}

#[async_trait]
impl AgentRunner for ScriptedRunner {
    async fn run(
        &self,
        agent: &AgentDescriptor,
        mut input: Vec<InputItem>,
        context: &mut SessionContext,
    ) -> VitalisResult<RunOutput> {
        let message = input
            .iter()
            .rev()
            .find(|item| item.role == Role::User)
            .map(|item| item.content.clone())
            .unwrap_or_default();

        let mut items = Vec::new();
        self.respond(agent, &message, context, &mut items, true)?;

        for item in &items {
            match item {
                RunItem::Message { content, .. } => input.push(InputItem::assistant(content.clone())),
                RunItem::ToolOutput { output, .. } => input.push(InputItem::tool(output.clone())),
                RunItem::Handoff { .. } | RunItem::ToolCall { .. } => {}
            }
        }

        Ok(RunOutput { new_items: items, input_items: input })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
