//! Health relevance guardrail.
//!
//! Greetings and self-introductions are let through without asking the
//! judge, so onboarding works before the user has said anything about
//! health. Every other message goes to the judge, and an irrelevant verdict
//! trips the guardrail.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use vitalis_contracts::{
    context::SessionContext,
    error::{VitalisError, VitalisResult},
    guardrail::GuardrailVerdict,
};
use vitalis_core::traits::{ContentJudge, Guardrail, JudgeRequest};

use crate::config::{GuardrailConfig, FAST_PATH_REASONING};

pub const HEALTH_RELEVANCE: &str = "Health Relevance Guardrail";

pub struct HealthRelevanceGuardrail {
    config: Arc<GuardrailConfig>,
    judge: Arc<dyn ContentJudge>,
}

impl HealthRelevanceGuardrail {
    pub fn new(config: Arc<GuardrailConfig>, judge: Arc<dyn ContentJudge>) -> Self {
        Self { config, judge }
    }
}

#[async_trait]
impl Guardrail for HealthRelevanceGuardrail {
    fn name(&self) -> &str {
        HEALTH_RELEVANCE
    }

    async fn check(&self, message: &str, context: &SessionContext) -> VitalisResult<GuardrailVerdict> {
        if self.config.is_fast_path(message) {
            debug!(guardrail = HEALTH_RELEVANCE, "fast path allow");
            return Ok(GuardrailVerdict::allow(FAST_PATH_REASONING)
                .with_info(json!({ "reasoning": FAST_PATH_REASONING, "is_relevant": true })));
        }

        let verdict = self
            .judge
            .judge(JudgeRequest {
                guardrail: HEALTH_RELEVANCE,
                instructions: &self.config.relevance_instructions,
                message,
                context,
            })
            .await
            .map_err(|e| VitalisError::GuardrailFailed {
                guardrail: HEALTH_RELEVANCE.to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            guardrail = HEALTH_RELEVANCE,
            is_relevant = verdict.accepted,
            "judge answered"
        );

        let info = json!({ "reasoning": verdict.reasoning, "is_relevant": verdict.accepted });
        let outcome = if verdict.accepted {
            GuardrailVerdict::allow(verdict.reasoning)
        } else {
            GuardrailVerdict::trip(verdict.reasoning)
        };
        Ok(outcome.with_info(info))
    }
}
