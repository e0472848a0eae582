//! Guardrail configuration schema.
//!
//! `GuardrailConfig` is deserialized from TOML. Every field has a default,
//! so an empty document yields the stock wellness settings.
//!
//! Example in TOML:
//! ```toml
//! greetings = ["hi", "hello"]
//! onboarding_phrases = ["my name is"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use vitalis_contracts::error::{VitalisError, VitalisResult};

/// Reasoning reported for messages the relevance fast path lets through.
pub const FAST_PATH_REASONING: &str = "Greeting or onboarding message, always allowed.";

const DEFAULT_GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "hy",
    "hii",
    "helo",
    "hey there",
];

// Trailing spaces are significant: "im " must not match "important".
const DEFAULT_ONBOARDING: &[&str] = &["my name is", "i am", "call me", "it's", "im ", "i\u{2019}m "];

const DEFAULT_RELEVANCE_INSTRUCTIONS: &str = "Determine if the user's message is related to health, \
fitness, nutrition, wellness, or medical topics. Return is_relevant=True if it is health-related, \
else False, with brief reasoning.";

const DEFAULT_GOAL_INSTRUCTIONS: &str = "Validate if the user's health goal input follows the \
required format: quantity, metric, duration. Examples of valid goals: 'lose 5kg in 2 months', \
'build muscle in 3 months', 'run 5km in 4 weeks'. Return is_valid=True if the goal has clear \
quantity, metric, and duration, else False. If valid, provide structured_goal with objective, \
quantity, metric, and duration fields.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Lowercase prefixes that mark a message as a greeting.
    pub greetings: Vec<String>,

    /// Lowercase prefixes that mark a message as the user introducing
    /// themselves.
    pub onboarding_phrases: Vec<String>,

    /// Question put to the judge by the health relevance guardrail.
    pub relevance_instructions: String,

    /// Question put to the judge by the goal validation guardrail.
    pub goal_instructions: String,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            greetings: DEFAULT_GREETINGS.iter().map(|s| s.to_string()).collect(),
            onboarding_phrases: DEFAULT_ONBOARDING.iter().map(|s| s.to_string()).collect(),
            relevance_instructions: DEFAULT_RELEVANCE_INSTRUCTIONS.to_string(),
            goal_instructions: DEFAULT_GOAL_INSTRUCTIONS.to_string(),
        }
    }
}

impl GuardrailConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `VitalisError::ConfigError` if the TOML is malformed or does
    /// not match the schema.
    pub fn from_toml_str(s: &str) -> VitalisResult<Self> {
        toml::from_str(s).map_err(|e| VitalisError::ConfigError {
            reason: format!("failed to parse guardrail TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML guardrail configuration.
    pub fn from_file(path: &Path) -> VitalisResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VitalisError::ConfigError {
            reason: format!("failed to read guardrail file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// True when `message` opens with a greeting or onboarding phrase.
    /// Leading/trailing whitespace and case are ignored.
    pub fn is_fast_path(&self, message: &str) -> bool {
        let cleaned = message.trim().to_lowercase();
        self.greetings
            .iter()
            .chain(self.onboarding_phrases.iter())
            .any(|prefix| cleaned.starts_with(prefix.as_str()))
    }
}
