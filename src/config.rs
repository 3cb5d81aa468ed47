//! Engine Configuration
//!
//! Registry names, message keys and built-in fallback messages.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationEngineError, ValidationResult};

/// Placeholder replaced by the rule-type key in validator namespaces
pub const RULE_PLACEHOLDER: &str = "{}";

/// Validation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Primary validator name template (default: "validator:{}")
    #[serde(default = "default_validator_namespace")]
    pub validator_namespace: String,

    /// Vendored validator name template (default: "vendor/validator:{}")
    #[serde(default = "default_vendored_validator_namespace")]
    pub vendored_validator_namespace: String,

    /// Primary message resolver name (default: "messages:validation")
    #[serde(default = "default_messages_name")]
    pub messages_name: String,

    /// Vendored message resolver name (default: "vendor/messages:validation")
    #[serde(default = "default_vendored_messages_name")]
    pub vendored_messages_name: String,

    /// Message key for the summary of a rejected commit (default: "invalid")
    #[serde(default = "default_generic_message_key")]
    pub generic_message_key: String,

    /// Summary used when no resolver provides one
    #[serde(default = "default_generic_message")]
    pub default_generic_message: String,

    /// Field message used by validators when no resolver provides one
    #[serde(default = "default_field_message")]
    pub default_field_message: String,
}

fn default_validator_namespace() -> String {
    "validator:{}".to_string()
}

fn default_vendored_validator_namespace() -> String {
    "vendor/validator:{}".to_string()
}

fn default_messages_name() -> String {
    "messages:validation".to_string()
}

fn default_vendored_messages_name() -> String {
    "vendor/messages:validation".to_string()
}

fn default_generic_message_key() -> String {
    "invalid".to_string()
}

fn default_generic_message() -> String {
    "Validation failed".to_string()
}

fn default_field_message() -> String {
    "is invalid".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validator_namespace: default_validator_namespace(),
            vendored_validator_namespace: default_vendored_validator_namespace(),
            messages_name: default_messages_name(),
            vendored_messages_name: default_vendored_messages_name(),
            generic_message_key: default_generic_message_key(),
            default_generic_message: default_generic_message(),
            default_field_message: default_field_message(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(content: &str) -> ValidationResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)
            .map_err(|e| ValidationEngineError::Config(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ValidationEngineError::Config(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Reject namespace templates that cannot carry a rule-type key.
    pub fn validate(&self) -> ValidationResult<()> {
        for (name, template) in [
            ("validator_namespace", &self.validator_namespace),
            ("vendored_validator_namespace", &self.vendored_validator_namespace),
        ] {
            if !template.contains(RULE_PLACEHOLDER) {
                return Err(ValidationEngineError::Config(format!(
                    "{} '{}' is missing the '{}' placeholder",
                    name, template, RULE_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }

    /// Candidate validator names for a rule type, primary first.
    pub fn validator_names(&self, rule_type: &str) -> [String; 2] {
        [
            self.validator_namespace.replacen(RULE_PLACEHOLDER, rule_type, 1),
            self.vendored_validator_namespace
                .replacen(RULE_PLACEHOLDER, rule_type, 1),
        ]
    }

    /// Candidate message resolver names, primary first.
    pub fn message_names(&self) -> [&str; 2] {
        [&self.messages_name, &self.vendored_messages_name]
    }
}
