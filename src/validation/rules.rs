//! Rule descriptor resolution
//!
//! A field's `validation` declaration is absent, one rule object, or a list
//! of rule objects. Each key of each rule object becomes one descriptor:
//! list order first, then key order within an object.
//!
//! ```text
//! {"presence": true, "length": {"min": 3}}    -> presence, length
//! [{"length": {"min": 3}}, {"length": {"max": 9}}] -> length, length
//! ```

use serde_json::{Map, Value};

use super::errors::{ValidationEngineError, ValidationResult};
use crate::record::FieldDescriptor;

/// One resolved unit of work
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDescriptor {
    /// Key naming the validator to use
    pub rule_type: String,
    /// Scalar shorthand or configuration object
    pub rule_value: Value,
    /// Owning field name
    pub field: String,
}

/// Expand a field's declaration into rule descriptors.
///
/// # Errors
///
/// `MalformedRule` when the declaration is neither an object nor a list
/// of objects.
pub fn resolve_rules(field: &FieldDescriptor) -> ValidationResult<Vec<RuleDescriptor>> {
    let rule_objects: Vec<&Map<String, Value>> = match &field.validation {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(rules)) => vec![rules],
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                item.as_object().ok_or_else(|| malformed(field, position, item))
            })
            .collect::<ValidationResult<_>>()?,
        Some(other) => {
            return Err(ValidationEngineError::MalformedRule {
                field: field.name.clone(),
                reason: format!("expected object or list of objects, got {}", other),
            })
        }
    };

    Ok(rule_objects
        .into_iter()
        .flat_map(|rules| rules.iter())
        .map(|(rule_type, rule_value)| RuleDescriptor {
            rule_type: rule_type.clone(),
            rule_value: rule_value.clone(),
            field: field.name.clone(),
        })
        .collect())
}

fn malformed(field: &FieldDescriptor, position: usize, item: &Value) -> ValidationEngineError {
    ValidationEngineError::MalformedRule {
        field: field.name.clone(),
        reason: format!("rule at position {} is not an object: {}", position, item),
    }
}

/// Give every rule value the object shape.
///
/// Objects pass through unchanged; anything else becomes `{rule_type: value}`.
pub fn normalize_rule_value(rule_type: &str, rule_value: &Value) -> Map<String, Value> {
    match rule_value {
        Value::Object(options) => options.clone(),
        scalar => {
            let mut options = Map::new();
            options.insert(rule_type.to_string(), scalar.clone());
            options
        }
    }
}

/// Case-folded identifier for a rule type, used as its message key
pub fn rule_key(rule_type: &str) -> String {
    rule_type.to_lowercase()
}
