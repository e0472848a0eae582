//! Demo configuration file.
//!
//! ```toml
//! [orchestrator]
//! unknown_conversation = "reject"
//! runner_timeout_ms = 5000
//!
//! [guardrails]
//! greetings = ["hi", "hello", "hey"]
//! ```
//!
//! Both tables are optional, as is every key inside them.

use std::path::Path;

use serde::Deserialize;

use vitalis_contracts::error::{VitalisError, VitalisResult};
use vitalis_core::OrchestratorConfig;
use vitalis_guardrails::GuardrailConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub orchestrator: OrchestratorConfig,
    pub guardrails: GuardrailConfig,
}

impl DemoConfig {
    pub fn from_toml_str(s: &str) -> VitalisResult<Self> {
        toml::from_str(s).map_err(|e| VitalisError::ConfigError {
            reason: format!("failed to parse demo config: {}", e),
        })
    }

    /// Load `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> VitalisResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|e| VitalisError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
