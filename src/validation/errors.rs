//! Validation error types
//!
//! Error codes:
//! - FIELDGUARD_UNKNOWN_RULE_TYPE (FATAL)
//! - FIELDGUARD_MALFORMED_RULE (FATAL)
//! - FIELDGUARD_UNEXPECTED_OUTCOME (FATAL)
//! - FIELDGUARD_CONFIG_INVALID (FATAL)
//!
//! Field failures are not errors: they land in the record's error
//! collection and, on commit, in a [`ValidationError`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::observability::Severity;
use crate::record::ErrorCollection;

/// Result type for engine operations
pub type ValidationResult<T> = Result<T, ValidationEngineError>;

/// Configuration errors that abort a validation pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationEngineError {
    /// No validator registered under either namespace
    #[error("No validator registered for rule type '{0}'")]
    UnknownRuleType(String),

    /// A `validation` declaration that is not an object or a list of objects
    #[error("Malformed validation rules on field '{field}': {reason}")]
    MalformedRule { field: String, reason: String },

    /// A dynamic validator returned something other than a string or nothing
    #[error("Validator '{rule_type}' returned unsupported result shape: {shape}")]
    UnexpectedOutcome { rule_type: String, shape: String },

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ValidationEngineError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRuleType(_) => "FIELDGUARD_UNKNOWN_RULE_TYPE",
            Self::MalformedRule { .. } => "FIELDGUARD_MALFORMED_RULE",
            Self::UnexpectedOutcome { .. } => "FIELDGUARD_UNEXPECTED_OUTCOME",
            Self::Config(_) => "FIELDGUARD_CONFIG_INVALID",
        }
    }

    /// Every engine error is a developer-facing contract violation
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Failure reported by the external commit operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// The backend refused the record
    #[error("Commit rejected by backend: {0}")]
    Rejected(String),

    /// The commit could not be delivered
    #[error("Commit transport failed: {0}")]
    Transport(String),
}

/// Aggregate returned when a commit is refused because validation failed.
///
/// Immutable once built; `errors` is the record's collection at the moment
/// of failure.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    id: Uuid,
    message: String,
    errors: ErrorCollection,
    failed_at: DateTime<Utc>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, errors: ErrorCollection) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            errors,
            failed_at: Utc::now(),
        }
    }

    /// Correlation id, also written to the COMMIT_REJECTED log line
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Human-readable summary
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field-keyed failure messages
    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn failed_at(&self) -> DateTime<Utc> {
        self.failed_at
    }
}

/// Outcome of a refused or failed save
#[derive(Debug, Error)]
pub enum SaveError {
    /// Validation failed; the commit operation was never invoked
    #[error("{0}")]
    Invalid(ValidationError),

    /// The commit operation ran and failed
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// The validation pass aborted on a configuration error
    #[error(transparent)]
    Engine(#[from] ValidationEngineError),
}

impl SaveError {
    /// The validation aggregate, when the save was refused for invalid fields
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            SaveError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for SaveError {
    fn from(err: ValidationError) -> Self {
        SaveError::Invalid(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ValidationEngineError::UnknownRuleType("presence".into()).code(),
            "FIELDGUARD_UNKNOWN_RULE_TYPE"
        );
        assert_eq!(
            ValidationEngineError::Config("x".into()).code(),
            "FIELDGUARD_CONFIG_INVALID"
        );
    }

    #[test]
    fn test_unknown_rule_type_names_key() {
        let err = ValidationEngineError::UnknownRuleType("uniqueness".into());
        assert!(err.is_fatal());
        assert!(err.to_string().contains("uniqueness"));
    }

    #[test]
    fn test_validation_error_carries_collection() {
        let mut errors = ErrorCollection::new();
        errors.add("name", "can't be blank");

        let err = ValidationError::new("Validation failed", errors.clone());
        assert_eq!(err.message(), "Validation failed");
        assert_eq!(err.errors(), &errors);
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn test_validation_error_serializes() {
        let mut errors = ErrorCollection::new();
        errors.add("name", "can't be blank");

        let encoded = serde_json::to_value(ValidationError::new("Validation failed", errors)).unwrap();
        assert_eq!(encoded["message"], "Validation failed");
        assert_eq!(encoded["errors"]["name"][0], "can't be blank");
        assert!(encoded["id"].is_string());
    }

    #[test]
    fn test_save_error_accessor() {
        let err: SaveError = ValidationError::new("Validation failed", ErrorCollection::new()).into();
        assert!(err.validation_error().is_some());

        let err: SaveError = CommitError::Transport("timeout".into()).into();
        assert!(err.validation_error().is_none());
    }
}
