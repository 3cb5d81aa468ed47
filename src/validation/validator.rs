//! Validator contract
//!
//! A validator is built fresh for every rule descriptor from a
//! [`ValidatorConfig`] and checks one field's current value.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::errors::{ValidationEngineError, ValidationResult};
use super::messages::{message_or_default, MessageResolver};
use crate::record::{FieldDescriptor, Record};

/// Result of one validator invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorOutcome {
    Passed,
    Failed(String),
}

impl ValidatorOutcome {
    /// Interpret a dynamic result.
    ///
    /// `null` and `""` pass, a non-empty string fails with that message,
    /// any other shape is rejected.
    pub fn from_value(rule_type: &str, value: Value) -> ValidationResult<Self> {
        match value {
            Value::Null => Ok(ValidatorOutcome::Passed),
            Value::String(s) if s.is_empty() => Ok(ValidatorOutcome::Passed),
            Value::String(s) => Ok(ValidatorOutcome::Failed(s)),
            other => Err(ValidationEngineError::UnexpectedOutcome {
                rule_type: rule_type.to_string(),
                shape: json_type_name(&other).to_string(),
            }),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ValidatorOutcome::Failed(_))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Everything a validator is constructed from
#[derive(Clone)]
pub struct ValidatorConfig {
    /// Rule-type key as declared
    pub rule_type: String,
    /// Case-folded rule type, used as the message key
    pub key: String,
    /// Normalized rule options; scalar shorthand is wrapped as `{rule_type: value}`
    pub options: Map<String, Value>,
    /// Name of the field the rule belongs to
    pub attribute: String,
    /// Message catalog, absent when neither namespace provides one
    pub message_resolver: Option<Arc<dyn MessageResolver>>,
    /// Message used when the catalog has no entry for `key`
    pub default_message: String,
}

impl ValidatorConfig {
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Failure text for this rule's key
    pub fn message(&self) -> String {
        self.message_for(&self.key)
    }

    /// Failure text for an arbitrary key
    pub fn message_for(&self, key: &str) -> String {
        message_or_default(
            self.message_resolver.as_deref(),
            key,
            &self.default_message,
        )
    }
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("rule_type", &self.rule_type)
            .field("key", &self.key)
            .field("options", &self.options)
            .field("attribute", &self.attribute)
            .field("message_resolver", &self.message_resolver.is_some())
            .field("default_message", &self.default_message)
            .finish()
    }
}

/// A check of one rule against one field
pub trait Validator: Send + Sync {
    /// Check `value`, the current value of `field_name` on `record`.
    ///
    /// `field` carries the owning record type. Errors abort the pass.
    fn validate(
        &self,
        field_name: &str,
        value: &Value,
        field: &FieldDescriptor,
        record: &dyn Record,
    ) -> ValidationResult<ValidatorOutcome>;
}

/// Builds a validator from its configuration
pub type ValidatorFactory = Arc<dyn Fn(ValidatorConfig) -> Box<dyn Validator> + Send + Sync>;

type CheckFn = dyn Fn(&ValidatorConfig, &Value, &FieldDescriptor, &dyn Record) -> ValidationResult<ValidatorOutcome>
    + Send
    + Sync;

/// Validator backed by a closure
pub struct FnValidator {
    config: ValidatorConfig,
    check: Arc<CheckFn>,
}

impl FnValidator {
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }
}

impl Validator for FnValidator {
    fn validate(
        &self,
        _field_name: &str,
        value: &Value,
        field: &FieldDescriptor,
        record: &dyn Record,
    ) -> ValidationResult<ValidatorOutcome> {
        (self.check)(&self.config, value, field, record)
    }
}

fn factory_from(check: Arc<CheckFn>) -> ValidatorFactory {
    Arc::new(move |config: ValidatorConfig| {
        Box::new(FnValidator {
            config,
            check: Arc::clone(&check),
        }) as Box<dyn Validator>
    })
}

/// Factory for a closure that only needs the configuration and the value
pub fn validator_fn<F>(check: F) -> ValidatorFactory
where
    F: Fn(&ValidatorConfig, &Value) -> ValidatorOutcome + Send + Sync + 'static,
{
    factory_from(Arc::new(
        move |config: &ValidatorConfig,
              value: &Value,
              _: &FieldDescriptor,
              _: &dyn Record|
              -> ValidationResult<ValidatorOutcome> { Ok(check(config, value)) },
    ))
}

/// Factory for a closure that inspects the field and the whole record
pub fn record_validator_fn<F>(check: F) -> ValidatorFactory
where
    F: Fn(&ValidatorConfig, &Value, &FieldDescriptor, &dyn Record) -> ValidatorOutcome
        + Send
        + Sync
        + 'static,
{
    factory_from(Arc::new(
        move |config: &ValidatorConfig,
              value: &Value,
              field: &FieldDescriptor,
              record: &dyn Record|
              -> ValidationResult<ValidatorOutcome> { Ok(check(config, value, field, record)) },
    ))
}

/// Factory for a closure producing a dynamic JSON result, see
/// [`ValidatorOutcome::from_value`]
pub fn json_validator_fn<F>(check: F) -> ValidatorFactory
where
    F: Fn(&ValidatorConfig, &Value) -> Value + Send + Sync + 'static,
{
    factory_from(Arc::new(
        move |config: &ValidatorConfig,
              value: &Value,
              _: &FieldDescriptor,
              _: &dyn Record|
              -> ValidationResult<ValidatorOutcome> {
            ValidatorOutcome::from_value(&config.rule_type, check(config, value))
        },
    ))
}
