//! The per-conversation fact sheet that agents build up across turns.
//!
//! `SessionContext` is created once per conversation and mutated only by
//! tool invocations and handoff hooks. Optional fields are overwritten, never
//! cleared; the two log sequences are append-only.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Accumulated facts about one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// The user's name, once captured.
    pub name: Option<String>,
    /// Random six-digit identifier assigned at creation.
    pub uid: u32,
    /// The structured health goal, once analyzed.
    pub goal: Option<GoalStructure>,
    /// Free-form dietary preference text (e.g. "vegetarian").
    pub diet_preferences: Option<String>,
    /// The most recently recommended workout plan.
    pub workout_plan: Option<WorkoutPlan>,
    /// A seven-entry meal plan, one line per day.
    pub meal_plan: Option<Vec<String>>,
    /// Free-form injury description used to tailor workouts.
    pub injury_notes: Option<String>,
    /// Timestamped audit lines appended by handoff hooks.
    #[serde(default)]
    pub handoff_logs: Vec<String>,
    /// Check-ins and progress updates, in append order.
    #[serde(default)]
    pub progress_logs: Vec<ProgressLog>,
}

impl SessionContext {
    /// Create an empty context with a random uid in `100000..=999999`.
    pub fn new() -> Self {
        let uid = rand::thread_rng().gen_range(100_000..=999_999);
        Self::with_uid(uid)
    }

    /// Create an empty context with a fixed uid.
    pub fn with_uid(uid: u32) -> Self {
        Self {
            name: None,
            uid,
            goal: None,
            diet_preferences: None,
            workout_plan: None,
            meal_plan: None,
            injury_notes: None,
            handoff_logs: Vec::new(),
            progress_logs: Vec::new(),
        }
    }

    /// Append a line to the handoff audit trail.
    pub fn record_handoff(&mut self, line: impl Into<String>) {
        self.handoff_logs.push(line.into());
    }

    /// Append a progress entry stamped with the current time.
    pub fn log_progress(&mut self, entry: ProgressEntry) {
        self.progress_logs.push(ProgressLog {
            date: Utc::now(),
            entry,
        });
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A health goal broken into its measurable parts.
///
/// Example: "lose 5kg in 2 months" → weight loss / 5.0 / kg / 2 months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalStructure {
    pub objective: String,
    pub quantity: f64,
    pub metric: String,
    pub duration: String,
    pub priority: String,
}

/// A recommended training plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Plan identifier, e.g. "low_impact_strength_training".
    #[serde(rename = "type")]
    pub kind: String,
    pub frequency: String,
    pub duration: String,
    pub notes: String,
    pub exercises: Vec<String>,
    /// Movements to stay away from. Empty when nothing is restricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avoid: Vec<String>,
}

/// One entry in `SessionContext::progress_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: ProgressEntry,
}

/// What a progress log entry records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEntry {
    /// A weekly check-in was booked.
    CheckinScheduled { next_checkin: DateTime<Utc> },
    /// The user reported progress against their goal.
    ProgressUpdate { update: String, metric_value: f64 },
}
