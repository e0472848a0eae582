//! # vitalis-guardrails
//!
//! Input guardrails for the wellness assistant.
//!
//! ## Overview
//!
//! - [`HealthRelevanceGuardrail`] lets greetings and introductions through
//!   on a fast path and asks a [`ContentJudge`](vitalis_core::traits::ContentJudge)
//!   about everything else. An irrelevant message trips it.
//! - [`GoalValidationGuardrail`] asks the judge whether the message is a
//!   well-formed goal and reports the answer. It never trips.
//!
//! Both read their phrase lists and judge instructions from a
//! [`GuardrailConfig`], which loads from TOML.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::{path::Path, sync::Arc};
//! use vitalis_guardrails::{GuardrailConfig, HealthRelevanceGuardrail};
//!
//! let config = Arc::new(GuardrailConfig::from_file(Path::new("vitalis.toml"))?);
//! let relevance = HealthRelevanceGuardrail::new(config, judge);
//! ```

pub mod config;
pub mod goal;
pub mod relevance;

pub use config::{GuardrailConfig, FAST_PATH_REASONING};
pub use goal::{GoalValidationGuardrail, GOAL_VALIDATION};
pub use relevance::{HealthRelevanceGuardrail, HEALTH_RELEVANCE};

// ── Tests ─────────────────────────────────────────────────────────────────────
