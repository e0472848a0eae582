//! Error types for the vitalis turn pipeline.
//!
//! All fallible operations return `VitalisResult<T>`. Guardrail refusals,
//! unknown agent names, and unparsable tool arguments are recovered locally
//! and never surface here.

use thiserror::Error;

/// The unified error type for the vitalis workspace.
#[derive(Debug, Error)]
pub enum VitalisError {
    /// A supplied conversation id has no stored state and the orchestrator
    /// is configured to reject rather than start a new conversation.
    #[error("conversation '{conversation_id}' not found")]
    UnknownConversation { conversation_id: String },

    /// The agent runner raised, timed out, or returned unusable output.
    #[error("agent runner failed: {reason}")]
    RunnerFailure { reason: String },

    /// A handoff was requested along an edge the graph does not declare.
    #[error("agent '{from}' may not hand off to '{to}'")]
    IllegalHandoff { from: String, to: String },

    /// A tool rejected its arguments or failed while running.
    #[error("tool '{tool}' failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    /// A guardrail could not reach a verdict (its judge failed).
    #[error("guardrail '{guardrail}' failed: {reason}")]
    GuardrailFailed { guardrail: String, reason: String },

    /// The conversation store could not read or write state.
    #[error("conversation store failure: {reason}")]
    StoreFailure { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Reading from or writing to the process's own streams failed.
    #[error("i/o error while {action}: {source}")]
    Io {
        action: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the vitalis crates.
pub type VitalisResult<T> = Result<T, VitalisError>;
