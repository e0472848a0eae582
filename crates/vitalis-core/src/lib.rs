//! # vitalis-core
//!
//! Turn orchestration for the vitalis session router.
//!
//! This crate provides:
//! - The seams a deployment plugs into (`AgentRunner`, `ConversationStore`,
//!   `Guardrail`, `ContentJudge`, `Tool`)
//! - The `AgentRegistry` with its star-shaped handoff graph
//! - The `TurnOrchestrator` that runs guardrails, the agent, output
//!   classification and the context diff in that order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitalis_core::{TurnOrchestrator, AgentRegistry, OrchestratorConfig};
//! ```

pub mod classify;
pub mod config;
pub mod diff;
pub mod guardrail;
pub mod orchestrator;
pub mod registry;
pub mod traits;

pub use config::{OrchestratorConfig, UnknownConversationPolicy};
pub use orchestrator::TurnOrchestrator;
pub use registry::{AgentDescriptor, AgentRegistry, HandoffEdge, HandoffHook};
