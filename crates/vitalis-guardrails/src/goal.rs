//! Goal validation guardrail.
//!
//! Asks the judge whether the message states a goal with a quantity, a
//! metric and a duration. The answer is attached as output info only; this
//! guardrail never trips.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use vitalis_contracts::{
    context::SessionContext,
    error::{VitalisError, VitalisResult},
    guardrail::GuardrailVerdict,
};
use vitalis_core::traits::{ContentJudge, Guardrail, JudgeRequest};

use crate::config::GuardrailConfig;

pub const GOAL_VALIDATION: &str = "Goal Validation Guardrail";

pub struct GoalValidationGuardrail {
    config: Arc<GuardrailConfig>,
    judge: Arc<dyn ContentJudge>,
}

impl GoalValidationGuardrail {
    pub fn new(config: Arc<GuardrailConfig>, judge: Arc<dyn ContentJudge>) -> Self {
        Self { config, judge }
    }
}

#[async_trait]
impl Guardrail for GoalValidationGuardrail {
    fn name(&self) -> &str {
        GOAL_VALIDATION
    }

    async fn check(&self, message: &str, context: &SessionContext) -> VitalisResult<GuardrailVerdict> {
        let verdict = self
            .judge
            .judge(JudgeRequest {
                guardrail: GOAL_VALIDATION,
                instructions: &self.config.goal_instructions,
                message,
                context,
            })
            .await
            .map_err(|e| VitalisError::GuardrailFailed {
                guardrail: GOAL_VALIDATION.to_string(),
                reason: e.to_string(),
            })?;

        debug!(guardrail = GOAL_VALIDATION, is_valid = verdict.accepted, "judge answered");

        let info = json!({
            "reasoning": verdict.reasoning,
            "is_valid": verdict.accepted,
            "structured_goal": verdict.detail.clone().unwrap_or(Value::Null),
        });
        Ok(GuardrailVerdict::allow(verdict.reasoning).with_info(info))
    }
}
