//! A deterministic stand-in for the model-backed content judge.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use vitalis_contracts::{error::VitalisResult, guardrail::JudgeVerdict};
use vitalis_core::traits::{ContentJudge, JudgeRequest};
use vitalis_guardrails::GOAL_VALIDATION;

use crate::tools::{analyze_goal, states_measurable_goal};

/// Substrings that mark a message as a health, fitness or wellness topic.
const HEALTH_TERMS: &[&str] = &[
    "health", "fit", "diet", "meal", "eat", "food", "nutrition", "vegetarian", "vegan", "keto",
    "diabet", "calorie", "protein", "weight", "kg", "lbs", "lose", "gain", "muscle", "workout",
    "exercise", "train", "run", "walk", "yoga", "cardio", "stretch", "injur", "pain", "knee",
    "back", "sore", "sleep", "stress", "wellness", "goal", "progress", "check-in", "checkin",
    "coach", "doctor", "medical", "plan",
];

/// Answers relevance questions by keyword and goal questions with the same
/// parser the goal analyzer tool uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordJudge;

impl KeywordJudge {
    fn relevance(message: &str) -> JudgeVerdict {
        let lower = message.to_lowercase();
        match HEALTH_TERMS.iter().find(|term| lower.contains(*term)) {
            Some(term) => JudgeVerdict {
                reasoning: format!("Mentions '{}', a health or fitness topic.", term),
                accepted: true,
                detail: None,
            },
            None => JudgeVerdict {
                reasoning: "No health, fitness, or wellness topic found.".to_string(),
                accepted: false,
                detail: None,
            },
        }
    }

    fn goal(message: &str) -> JudgeVerdict {
        if !states_measurable_goal(message) {
            return JudgeVerdict {
                reasoning: "Goal lacks a clear quantity, metric, and duration.".to_string(),
                accepted: false,
                detail: None,
            };
        }
        let goal = analyze_goal(message);
        JudgeVerdict {
            reasoning: "Goal has a quantity, metric, and duration.".to_string(),
            accepted: true,
            detail: Some(json!({
                "objective": goal.objective,
                "quantity": goal.quantity,
                "metric": goal.metric,
                "duration": goal.duration,
            })),
        }
    }
}

#[async_trait]
impl ContentJudge for KeywordJudge {
    async fn judge(&self, request: JudgeRequest<'_>) -> VitalisResult<JudgeVerdict> {
        let verdict = if request.guardrail == GOAL_VALIDATION {
            Self::goal(request.message)
        } else {
            Self::relevance(request.message)
        };
        debug!(guardrail = %request.guardrail, accepted = verdict.accepted, "keyword judge");
        Ok(verdict)
    }
}
