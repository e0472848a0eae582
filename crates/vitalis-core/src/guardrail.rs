//! Ordered, short-circuiting guardrail evaluation.
//!
//! Guardrails run in the order the agent declares them. The first tripwire
//! stops evaluation; the report then lists every guardrail of the agent,
//! with only the tripping one marked as failed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use vitalis_contracts::{
    context::SessionContext, error::VitalisResult, guardrail::GuardrailCheck,
};

use crate::traits::Guardrail;

/// Result of running an agent's guardrails over one message.
#[derive(Debug, Clone)]
pub enum GuardrailOutcome {
    /// Every guardrail let the message through.
    Passed { checks: Vec<GuardrailCheck> },
    /// `guardrail` rejected the message.
    Tripped {
        guardrail: String,
        reasoning: String,
        checks: Vec<GuardrailCheck>,
    },
}

impl GuardrailOutcome {
    pub fn checks(&self) -> &[GuardrailCheck] {
        match self {
            GuardrailOutcome::Passed { checks } | GuardrailOutcome::Tripped { checks, .. } => checks,
        }
    }
}

/// Evaluate `guardrails` against `message` in order.
///
/// # Errors
///
/// Propagates the first guardrail error (e.g. a failed judge call). A
/// tripwire is not an error.
pub async fn evaluate_guardrails(
    guardrails: &[Arc<dyn Guardrail>],
    message: &str,
    context: &SessionContext,
) -> VitalisResult<GuardrailOutcome> {
    let mut passed = Vec::with_capacity(guardrails.len());

    for (idx, guardrail) in guardrails.iter().enumerate() {
        let verdict = guardrail.check(message, context).await?;

        if verdict.tripwire_triggered {
            info!(
                guardrail = %guardrail.name(),
                reasoning = %verdict.reasoning,
                "guardrail tripwire triggered"
            );
            let timestamp = Utc::now();
            let checks = guardrails
                .iter()
                .enumerate()
                .map(|(i, g)| {
                    if i == idx {
                        GuardrailCheck::new(g.name(), message, verdict.reasoning.clone(), false, timestamp)
                    } else {
                        GuardrailCheck::new(g.name(), message, "", true, timestamp)
                    }
                })
                .collect();
            return Ok(GuardrailOutcome::Tripped {
                guardrail: guardrail.name().to_string(),
                reasoning: verdict.reasoning,
                checks,
            });
        }

        debug!(guardrail = %guardrail.name(), "guardrail passed");
        passed.push(GuardrailCheck::new(
            guardrail.name(),
            message,
            verdict.reasoning,
            true,
            Utc::now(),
        ));
    }

    Ok(GuardrailOutcome::Passed { checks: passed })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use vitalis_contracts::{
        context::SessionContext,
        error::{VitalisError, VitalisResult},
        guardrail::GuardrailVerdict,
    };

    use super::{evaluate_guardrails, GuardrailOutcome};
    use crate::traits::Guardrail;

    /// Returns a fixed verdict and counts how often it was asked.
    struct FixedGuardrail {
        name: &'static str,
        trip: bool,
        calls: Arc<Mutex<u32>>,
    }

    impl FixedGuardrail {
        fn new(name: &'static str, trip: bool) -> Self {
            Self { name, trip, calls: Arc::new(Mutex::new(0)) }
        }
    }

    #[async_trait]
    impl Guardrail for FixedGuardrail {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self, _message: &str, _context: &SessionContext) -> VitalisResult<GuardrailVerdict> {
            *self.calls.lock().unwrap() += 1;
            if self.trip {
                Ok(GuardrailVerdict::trip(format!("{} says no", self.name)))
            } else {
                Ok(GuardrailVerdict::allow(format!("{} says yes", self.name)))
            }
        }
    }

    struct BrokenGuardrail;

    #[async_trait]
    impl Guardrail for BrokenGuardrail {
        fn name(&self) -> &str {
            "Broken"
        }

        async fn check(&self, _message: &str, _context: &SessionContext) -> VitalisResult<GuardrailVerdict> {
            Err(VitalisError::GuardrailFailed {
                guardrail: "Broken".to_string(),
                reason: "judge unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn all_passing_guardrails_report_their_reasoning() {
        let guardrails: Vec<Arc<dyn Guardrail>> = vec![
            Arc::new(FixedGuardrail::new("A", false)),
            Arc::new(FixedGuardrail::new("B", false)),
        ];
        let ctx = SessionContext::with_uid(100_000);

        let outcome = evaluate_guardrails(&guardrails, "hello", &ctx).await.unwrap();
        match outcome {
            GuardrailOutcome::Passed { checks } => {
                assert_eq!(checks.len(), 2);
                assert!(checks.iter().all(|c| c.passed));
                assert_eq!(checks[1].reasoning, "B says yes");
                assert_eq!(checks[0].input, "hello");
            }
            other => panic!("expected Passed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn tripwire_short_circuits_and_reports_every_guardrail() {
        let first = FixedGuardrail::new("First", true);
        let second = FixedGuardrail::new("Second", false);
        let second_calls = Arc::clone(&second.calls);
        let guardrails: Vec<Arc<dyn Guardrail>> = vec![Arc::new(first), Arc::new(second)];
        let ctx = SessionContext::with_uid(100_000);

        let outcome = evaluate_guardrails(&guardrails, "stock tips?", &ctx).await.unwrap();

        assert_eq!(*second_calls.lock().unwrap(), 0, "evaluation must stop at the tripwire");
        match outcome {
            GuardrailOutcome::Tripped { guardrail, reasoning, checks } => {
                assert_eq!(guardrail, "First");
                assert_eq!(reasoning, "First says no");
                assert_eq!(checks.len(), 2);
                assert_eq!(checks.iter().filter(|c| !c.passed).count(), 1);
                assert!(!checks[0].passed);
                assert!(checks[1].passed);
                assert_eq!(checks[1].reasoning, "");
            }
            other => panic!("expected Tripped, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn no_guardrails_always_passes() {
        let ctx = SessionContext::with_uid(100_000);
        let outcome = evaluate_guardrails(&[], "anything", &ctx).await.unwrap();
        assert!(matches!(outcome, GuardrailOutcome::Passed { ref checks } if checks.is_empty()));
    }

    #[tokio::test]
    async fn guardrail_error_propagates() {
        let guardrails: Vec<Arc<dyn Guardrail>> = vec![Arc::new(BrokenGuardrail)];
        let ctx = SessionContext::with_uid(100_000);

        let result = evaluate_guardrails(&guardrails, "hello", &ctx).await;
        assert!(matches!(result, Err(VitalisError::GuardrailFailed { .. })));
    }
}
