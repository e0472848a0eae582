//! The wellness tools.
//!
//! Each tool owns a fixed set of `SessionContext` fields and writes nothing
//! else. The plan builders are plain functions so they can be tested (and
//! reused by the scripted judge) without a context.
//!
//! | Tool                       | Writes                              |
//! |----------------------------|-------------------------------------|
//! | `set_user_name`            | `name`                              |
//! | `goal_analyzer_tool`       | `goal`                              |
//! | `meal_planner_tool`        | `diet_preferences`, `meal_plan`     |
//! | `workout_recommender_tool` | `workout_plan`, `injury_notes`      |
//! | `checkin_scheduler_tool`   | `progress_logs`                     |
//! | `progress_tracker_tool`    | `progress_logs`                     |
//! | `display_workout_selector` | nothing                             |

use std::sync::LazyLock;

use chrono::{Duration, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use vitalis_contracts::{
    context::{GoalStructure, ProgressEntry, SessionContext, WorkoutPlan},
    error::{VitalisError, VitalisResult},
};
use vitalis_core::traits::Tool;

pub const SET_USER_NAME: &str = "set_user_name";
pub const GOAL_ANALYZER: &str = "goal_analyzer_tool";
pub const MEAL_PLANNER: &str = "meal_planner_tool";
pub const WORKOUT_RECOMMENDER: &str = "workout_recommender_tool";
pub const CHECKIN_SCHEDULER: &str = "checkin_scheduler_tool";
pub const PROGRESS_TRACKER: &str = "progress_tracker_tool";
pub const WORKOUT_SELECTOR: &str = "display_workout_selector";

pub const NAME_PROMPT: &str =
    "I'm here to help you! Could you please tell me your actual name so I can personalize your experience?";

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(kg|pounds|lbs|km|miles)").expect("valid quantity regex")
});
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(month|week|day)s?").expect("valid duration regex"));

// ── Plan builders ────────────────────────────────────────────────────────────

/// Break a free-text goal into its parts. Missing parts fall back to
/// 5.0 kg over 2 months.
pub fn analyze_goal(text: &str) -> GoalStructure {
    let lower = text.to_lowercase();

    let objective = if lower.contains("lose") || lower.contains("weight loss") {
        "weight loss"
    } else if lower.contains("gain") || lower.contains("muscle") {
        "muscle gain"
    } else if lower.contains("run") || lower.contains("cardio") {
        "cardio fitness"
    } else {
        "general fitness"
    };

    let (quantity, metric) = QUANTITY_RE
        .captures(&lower)
        .and_then(|c| Some((c[1].parse::<f64>().ok()?, c[2].to_string())))
        .unwrap_or_else(|| (5.0, "kg".to_string()));

    let duration = DURATION_RE
        .captures(&lower)
        .and_then(|c| {
            let n = c[1].parse::<u64>().ok()?;
            Some(format!("{} {}{}", n, &c[2], if n > 1 { "s" } else { "" }))
        })
        .unwrap_or_else(|| "2 months".to_string());

    GoalStructure {
        objective: objective.to_string(),
        quantity,
        metric,
        duration,
        priority: "high".to_string(),
    }
}

/// True when `text` names both an amount with a unit and a time span.
pub fn states_measurable_goal(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUANTITY_RE.is_match(&lower) && DURATION_RE.is_match(&lower)
}

/// Which meal plan a preference string selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietKind {
    Diabetic,
    Vegetarian,
    Keto,
    Balanced,
}

impl DietKind {
    pub fn detect(preferences: &str) -> Self {
        let lower = preferences.to_lowercase();
        if lower.contains("diabetic") || lower.contains("diabetes") {
            DietKind::Diabetic
        } else if lower.contains("vegetarian") {
            DietKind::Vegetarian
        } else if lower.contains("keto") || lower.contains("low-carb") {
            DietKind::Keto
        } else {
            DietKind::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DietKind::Diabetic => "diabetic-friendly",
            DietKind::Vegetarian => "vegetarian",
            DietKind::Keto => "keto/low-carb",
            DietKind::Balanced => "balanced",
        }
    }

    /// Seven entries, "Day 1: ..." through "Day 7: ...".
    pub fn meal_plan(self) -> Vec<String> {
        let days: [&str; 7] = match self {
            DietKind::Diabetic => [
                "Steel-cut oatmeal with berries and almonds (low glycemic)",
                "Grilled chicken breast with quinoa and steamed broccoli",
                "Baked salmon with roasted vegetables and brown rice",
                "Lentil soup with whole grain bread and mixed greens",
                "Greek yogurt with honey and low-sugar granola",
                "Turkey and avocado sandwich on whole grain bread",
                "Vegetable stir-fry with brown rice and tofu",
            ],
            DietKind::Vegetarian => [
                "Oatmeal with berries, nuts, and chia seeds",
                "Quinoa salad with chickpeas, vegetables, and tahini dressing",
                "Lentil curry with brown rice and steamed vegetables",
                "Vegetable soup with whole grain bread and mixed greens",
                "Greek yogurt with honey, granola, and fresh fruit",
                "Hummus and avocado sandwich on whole grain bread",
                "Vegetable stir-fry with tofu and brown rice",
            ],
            DietKind::Keto => [
                "Scrambled eggs with avocado and spinach",
                "Grilled chicken with cauliflower rice and broccoli",
                "Baked salmon with roasted asparagus",
                "Beef stir-fry with zucchini noodles",
                "Greek yogurt with berries and nuts",
                "Turkey and cheese roll-ups with cucumber",
                "Vegetable omelette with mushrooms and cheese",
            ],
            DietKind::Balanced => [
                "Oatmeal with berries and nuts",
                "Grilled chicken salad with quinoa",
                "Salmon with steamed vegetables",
                "Lentil soup with whole grain bread",
                "Greek yogurt with honey and granola",
                "Turkey and avocado sandwich",
                "Vegetable stir-fry with brown rice",
            ],
        };
        days.iter()
            .enumerate()
            .map(|(i, meal)| format!("Day {}: {}", i + 1, meal))
            .collect()
    }
}

fn plan(kind: &str, frequency: &str, duration: &str, notes: &str, exercises: &[&str], avoid: &[&str]) -> WorkoutPlan {
    WorkoutPlan {
        kind: kind.to_string(),
        frequency: frequency.to_string(),
        duration: duration.to_string(),
        notes: notes.to_string(),
        exercises: exercises.iter().map(|s| s.to_string()).collect(),
        avoid: avoid.iter().map(|s| s.to_string()).collect(),
    }
}

/// Pick a workout plan. Injuries take precedence over experience level.
pub fn workout_plan_for(experience_level: &str, injury_notes: &str) -> WorkoutPlan {
    let injury = injury_notes.to_lowercase();
    let level = experience_level.to_lowercase();

    if injury.contains("knee") {
        plan(
            "low_impact_strength_training",
            "3 times per week",
            "45 minutes",
            "Knee-friendly exercises focusing on upper body and core",
            &[
                "Seated shoulder press: 3 sets x 12 reps",
                "Bicep curls: 3 sets x 12 reps",
                "Tricep dips: 3 sets x 10 reps",
                "Planks: 3 sets x 30 seconds",
                "Seated leg extensions: 3 sets x 15 reps",
                "Straight-leg raises: 3 sets x 12 reps each leg",
                "Swimming or cycling (low-impact cardio): 20 minutes",
            ],
            &["Squats", "Lunges", "Jumping exercises", "High-impact cardio"],
        )
    } else if injury.contains("back") {
        plan(
            "core_focused_strength_training",
            "3 times per week",
            "40 minutes",
            "Back-friendly exercises with focus on core stability",
            &[
                "Bird dogs: 3 sets x 10 reps each side",
                "Cat-cow stretches: 3 sets x 10 reps",
                "Pelvic tilts: 3 sets x 15 reps",
                "Wall push-ups: 3 sets x 12 reps",
                "Seated rows: 3 sets x 12 reps",
                "Gentle walking: 20 minutes",
                "Yoga or stretching: 15 minutes",
            ],
            &["Heavy lifting", "Twisting movements", "High-impact exercises"],
        )
    } else if level.contains("beginner") {
        plan(
            "beginner_strength_training",
            "3 times per week",
            "30 minutes",
            "Beginner-friendly exercises with proper form focus",
            &[
                "Bodyweight squats: 3 sets x 10 reps",
                "Wall push-ups: 3 sets x 8 reps",
                "Planks: 3 sets x 20 seconds",
                "Walking: 20 minutes",
                "Stretching: 10 minutes",
            ],
            &[],
        )
    } else if level.contains("advanced") {
        plan(
            "advanced_strength_training",
            "4 times per week",
            "60 minutes",
            "Advanced exercises with progressive overload",
            &[
                "Barbell squats: 4 sets x 8 reps",
                "Bench press: 4 sets x 8 reps",
                "Deadlifts: 3 sets x 6 reps",
                "Pull-ups: 3 sets x 8 reps",
                "Planks: 3 sets x 60 seconds",
                "Cardio intervals: 20 minutes",
            ],
            &[],
        )
    } else {
        plan(
            "intermediate_strength_training",
            "3 times per week",
            "45 minutes",
            "Balanced strength and cardio program",
            &[
                "Squats: 3 sets x 12 reps",
                "Push-ups: 3 sets x 10 reps",
                "Planks: 3 sets x 30 seconds",
                "Lunges: 3 sets x 10 reps each leg",
                "Moderate cardio: 25 minutes",
            ],
            &[],
        )
    }
}

// ── Argument helpers ─────────────────────────────────────────────────────────

/// Tool arguments arrive either as a JSON object or as a JSON-encoded string.
fn decode_args(tool: &str, args: &Value) -> VitalisResult<Value> {
    match args {
        Value::String(raw) => serde_json::from_str(raw).map_err(|e| VitalisError::ToolFailed {
            tool: tool.to_string(),
            reason: format!("arguments are not valid JSON: {}", e),
        }),
        other => Ok(other.clone()),
    }
}

fn str_arg(tool: &str, args: &Value, key: &str) -> VitalisResult<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| VitalisError::ToolFailed {
            tool: tool.to_string(),
            reason: format!("missing string argument '{}'", key),
        })
}

fn pretty<T: Serialize>(tool: &str, value: &T) -> VitalisResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| VitalisError::ToolFailed {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

// ── Tools ────────────────────────────────────────────────────────────────────

/// Records the user's name, refusing greetings mistaken for names.
pub struct SetUserName {
    greetings: Vec<String>,
}

impl SetUserName {
    pub fn new(greetings: Vec<String>) -> Self {
        Self { greetings }
    }
}

/// True when `lower` opens with one of `greetings` as a whole word, so
/// "hi there" matches "hi" but "hiro" does not.
pub fn opens_with_greeting(lower: &str, greetings: &[String]) -> bool {
    greetings.iter().any(|g| {
        lower
            .strip_prefix(g.as_str())
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
    })
}

impl Tool for SetUserName {
    fn name(&self) -> &str {
        SET_USER_NAME
    }

    fn description(&self) -> &str {
        "Set the user's name in the session context."
    }

    fn invoke(&self, context: &mut SessionContext, args: &Value) -> VitalisResult<String> {
        let args = decode_args(SET_USER_NAME, args)?;
        let name = str_arg(SET_USER_NAME, &args, "name")?;
        let cleaned = name.trim().to_lowercase();

        if opens_with_greeting(&cleaned, &self.greetings) {
            debug!(name = %name, "greeting offered as a name, asking again");
            return Ok(NAME_PROMPT.to_string());
        }

        let name = name.trim().to_string();
        let reply = format!("Name set to {}.", name);
        context.name = Some(name);
        Ok(reply)
    }
}

pub struct GoalAnalyzer;

impl Tool for GoalAnalyzer {
    fn name(&self) -> &str {
        GOAL_ANALYZER
    }

    fn description(&self) -> &str {
        "Analyze user health goals and convert them into structured format."
    }

    fn invoke(&self, context: &mut SessionContext, args: &Value) -> VitalisResult<String> {
        let args = decode_args(GOAL_ANALYZER, args)?;
        let goal = analyze_goal(&str_arg(GOAL_ANALYZER, &args, "user_goal")?);
        let rendered = pretty(GOAL_ANALYZER, &goal)?;
        context.goal = Some(goal);
        Ok(format!("Goal analyzed and structured: {}", rendered))
    }
}

pub struct MealPlanner;

impl Tool for MealPlanner {
    fn name(&self) -> &str {
        MEAL_PLANNER
    }

    fn description(&self) -> &str {
        "Generate a 7-day meal plan based on dietary preferences and health goals."
    }

    fn invoke(&self, context: &mut SessionContext, args: &Value) -> VitalisResult<String> {
        let args = decode_args(MEAL_PLANNER, args)?;
        let preferences = str_arg(MEAL_PLANNER, &args, "dietary_preferences")?;
        let kind = DietKind::detect(&preferences);
        let meals = kind.meal_plan();

        let header = match kind {
            DietKind::Balanced => format!("7-day balanced meal plan generated for {} diet:", preferences),
            other => format!("7-day {} meal plan generated:", other.label()),
        };
        let reply = format!("{}\n{}", header, meals.join("\n"));

        context.diet_preferences = Some(preferences);
        context.meal_plan = Some(meals);
        Ok(reply)
    }
}

/// Builds a workout plan around the user's level and any injury.
///
/// An `injury_notes` argument, when given, is stored before the plan is
/// chosen; otherwise the notes already in context are used.
pub struct WorkoutRecommender;

impl Tool for WorkoutRecommender {
    fn name(&self) -> &str {
        WORKOUT_RECOMMENDER
    }

    fn description(&self) -> &str {
        "Suggest workout plan based on parsed goals and experience level."
    }

    fn invoke(&self, context: &mut SessionContext, args: &Value) -> VitalisResult<String> {
        let args = decode_args(WORKOUT_RECOMMENDER, args)?;
        let level = str_arg(WORKOUT_RECOMMENDER, &args, "experience_level")?;
        if let Some(notes) = args.get("injury_notes").and_then(Value::as_str) {
            context.injury_notes = Some(notes.to_string());
        }

        let plan = workout_plan_for(&level, context.injury_notes.as_deref().unwrap_or(""));
        let rendered = pretty(WORKOUT_RECOMMENDER, &plan)?;
        context.workout_plan = Some(plan);
        Ok(format!("Workout plan for {} level:\n{}", level, rendered))
    }
}

pub struct CheckinScheduler;

impl Tool for CheckinScheduler {
    fn name(&self) -> &str {
        CHECKIN_SCHEDULER
    }

    fn description(&self) -> &str {
        "Schedule recurring weekly progress checks."
    }

    fn invoke(&self, context: &mut SessionContext, _args: &Value) -> VitalisResult<String> {
        let next_checkin = Utc::now() + Duration::days(7);
        context.log_progress(ProgressEntry::CheckinScheduled { next_checkin });
        Ok(format!("Progress check-in scheduled for {}", next_checkin.format("%Y-%m-%d")))
    }
}

pub struct ProgressTracker;

impl Tool for ProgressTracker {
    fn name(&self) -> &str {
        PROGRESS_TRACKER
    }

    fn description(&self) -> &str {
        "Accept updates, track user progress, modify session context."
    }

    fn invoke(&self, context: &mut SessionContext, args: &Value) -> VitalisResult<String> {
        let args = decode_args(PROGRESS_TRACKER, args)?;
        let update = str_arg(PROGRESS_TRACKER, &args, "progress_update")?;
        let metric_value = args
            .get("metric_value")
            .and_then(Value::as_f64)
            .ok_or_else(|| VitalisError::ToolFailed {
                tool: PROGRESS_TRACKER.to_string(),
                reason: "missing numeric argument 'metric_value'".to_string(),
            })?;

        let reply = format!("Progress logged: {} - Value: {:?}", update, metric_value);
        context.log_progress(ProgressEntry::ProgressUpdate { update, metric_value });
        Ok(reply)
    }
}

/// Asks the client to show its workout picker. Touches no context.
pub struct WorkoutSelector;

impl Tool for WorkoutSelector {
    fn name(&self) -> &str {
        WORKOUT_SELECTOR
    }

    fn description(&self) -> &str {
        "Show the workout type selector in the client."
    }

    fn invoke(&self, _context: &mut SessionContext, _args: &Value) -> VitalisResult<String> {
        Ok("Workout selector displayed.".to_string())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
