//! Validation Pass Invariant Tests
//!
//! - Fields without rules never gain errors
//! - Rules of one field all run; failures accumulate in declaration order
//! - Repeated passes over unchanged fields give the same result
//! - Deleted records are never validated
//! - Unknown rule types abort the pass

use std::sync::{Arc, Mutex};

use fieldguard::record::{Document, FieldDescriptor, LifecycleSignal, Record, RecordStatus, TransitionLog};
use fieldguard::validation::{
    json_validator_fn, record_validator_fn, validator_fn, Namespace, StaticMessages,
    ValidationEngine, ValidationEngineError, ValidatorFactory, ValidatorOutcome,
};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn presence() -> ValidatorFactory {
    validator_fn(|config, value| {
        let blank = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if blank {
            ValidatorOutcome::Failed(config.message())
        } else {
            ValidatorOutcome::Passed
        }
    })
}

fn numeric() -> ValidatorFactory {
    validator_fn(|config, value| {
        if value.is_number() {
            ValidatorOutcome::Passed
        } else {
            ValidatorOutcome::Failed(config.message())
        }
    })
}

fn range() -> ValidatorFactory {
    validator_fn(|config, value| {
        let n = value.as_f64().unwrap_or(f64::NAN);
        let min = config.option("min").and_then(Value::as_f64).unwrap_or(f64::MIN);
        if n >= min {
            ValidatorOutcome::Passed
        } else {
            ValidatorOutcome::Failed(format!("must be at least {}", min))
        }
    })
}

fn length() -> ValidatorFactory {
    validator_fn(|config, value| {
        let len = value.as_str().map_or(0, |s| s.chars().count()) as u64;
        if let Some(min) = config.option("min").and_then(Value::as_u64) {
            if len < min {
                return ValidatorOutcome::Failed(format!("is too short (minimum is {})", min));
            }
        }
        if let Some(max) = config.option("max").and_then(Value::as_u64) {
            if len > max {
                return ValidatorOutcome::Failed(format!("is too long (maximum is {})", max));
            }
        }
        ValidatorOutcome::Passed
    })
}

fn engine() -> ValidationEngine {
    ValidationEngine::builder()
        .validator(Namespace::Primary, "presence", presence())
        .validator(Namespace::Primary, "numeric", numeric())
        .validator(Namespace::Vendored, "range", range())
        .validator(Namespace::Vendored, "length", length())
        .messages(
            Namespace::Primary,
            Arc::new(
                StaticMessages::new()
                    .with("presence", "can't be blank")
                    .with("numeric", "is not a number"),
            ),
        )
        .build()
        .unwrap()
}

fn user(name: &str) -> Document {
    Document::new("user").with_field(
        FieldDescriptor::attribute("name").with_validation(json!({"presence": true})),
        json!(name),
    )
}

// =============================================================================
// Rule Resolution and Execution
// =============================================================================

/// A record whose fields declare no rules is valid and gains no errors.
#[test]
fn test_fields_without_rules_record_nothing() {
    let engine = engine();
    let mut doc = Document::new("user")
        .with_field(FieldDescriptor::attribute("name"), json!(""))
        .with_field(FieldDescriptor::attribute("bio"), Value::Null);

    assert!(engine.validate(&mut doc, false).unwrap());
    assert!(doc.errors().is_empty());
}

/// Blank name fails presence; record ends up invalid.
#[test]
fn test_presence_failure_scenario() {
    let engine = engine();
    let log = Arc::new(TransitionLog::new());
    let mut doc = user("").with_status(RecordStatus::Clean);
    doc.subscribe(log.clone());

    assert!(!engine.validate(&mut doc, true).unwrap());
    assert_eq!(doc.errors().get("name"), ["can't be blank"]);
    assert_eq!(doc.status(), RecordStatus::Invalid);
    assert_eq!(
        log.signals(),
        vec![
            LifecycleSignal::WillCommit,
            LifecycleSignal::BecameDirty,
            LifecycleSignal::BecameInvalid,
        ]
    );
}

/// Two declaration positions, two failures, both preserved in order.
#[test]
fn test_list_rules_accumulate() {
    let engine = engine();
    let mut doc = Document::new("person").with_field(
        FieldDescriptor::attribute("age")
            .with_validation(json!([{"numeric": true}, {"range": {"min": 0}}])),
        json!("-5"),
    );

    assert!(!engine.validate(&mut doc, false).unwrap());
    assert_eq!(doc.errors().get("age"), ["is not a number", "must be at least 0"]);
}

/// A numeric -5 only fails the range rule.
#[test]
fn test_list_rules_fail_independently() {
    let engine = engine();
    let mut doc = Document::new("person").with_field(
        FieldDescriptor::attribute("age")
            .with_validation(json!([{"numeric": true}, {"range": {"min": 0}}])),
        json!(-5),
    );

    assert!(!engine.validate(&mut doc, false).unwrap());
    assert_eq!(doc.errors().get("age"), ["must be at least 0"]);
}

/// Two rule types at one position both run and both report.
#[test]
fn test_same_position_rules_both_run() {
    let engine = engine();
    let mut doc = Document::new("user").with_field(
        FieldDescriptor::attribute("name")
            .with_validation(json!({"presence": true, "length": {"min": 3}})),
        json!(""),
    );

    assert!(!engine.validate(&mut doc, false).unwrap());
    assert_eq!(
        doc.errors().get("name"),
        ["can't be blank", "is too short (minimum is 3)"]
    );
}

/// The same rule type may be declared twice with different options.
#[test]
fn test_repeated_rule_type() {
    let engine = engine();
    let mut doc = Document::new("user").with_field(
        FieldDescriptor::attribute("code")
            .with_validation(json!([{"length": {"min": 3}}, {"length": {"max": 4}}])),
        json!("abcdef"),
    );

    assert!(!engine.validate(&mut doc, false).unwrap());
    assert_eq!(doc.errors().get("code"), ["is too long (maximum is 4)"]);
}

/// Validators fall back to the built-in message without a catalog entry.
#[test]
fn test_missing_message_uses_default() {
    let engine = ValidationEngine::builder()
        .validator(Namespace::Primary, "presence", presence())
        .build()
        .unwrap();
    let mut doc = user("");

    assert!(!engine.validate(&mut doc, false).unwrap());
    assert_eq!(doc.errors().get("name"), ["is invalid"]);
}

/// Relationships run through the same rule path, after attributes.
#[test]
fn test_relationships_validated_after_attributes() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let seen = order.clone();
    let tracking = record_validator_fn(move |_, _, field, _| {
        seen.lock().unwrap().push(field.name.clone());
        ValidatorOutcome::Passed
    });

    let engine = ValidationEngine::builder()
        .validator(Namespace::Primary, "presence", presence())
        .validator(Namespace::Primary, "tracked", tracking)
        .build()
        .unwrap();

    let mut doc = Document::new("post")
        .with_field(
            FieldDescriptor::relationship("comments")
                .with_validation(json!([{"tracked": true}, {"presence": true}])),
            json!([]),
        )
        .with_field(
            FieldDescriptor::attribute("title").with_validation(json!({"tracked": true})),
            json!("Hello"),
        );

    assert!(!engine.validate(&mut doc, false).unwrap());
    assert_eq!(*order.lock().unwrap(), vec!["title", "comments"]);
    assert_eq!(doc.errors().get("comments"), ["is invalid"]);
    assert!(!doc.errors().has("title"));
}

/// Validators see the owning record type on the field descriptor.
#[test]
fn test_field_stamped_with_record_type() {
    let check = record_validator_fn(|_, _, field, record| {
        if field.record_type.as_deref() == Some(record.record_type()) {
            ValidatorOutcome::Passed
        } else {
            ValidatorOutcome::Failed("unstamped".into())
        }
    });
    let engine = ValidationEngine::builder()
        .validator(Namespace::Primary, "stamped", check)
        .build()
        .unwrap();

    let mut doc = Document::new("invoice").with_field(
        FieldDescriptor::attribute("total").with_validation(json!({"stamped": true})),
        json!(10),
    );
    assert!(engine.validate(&mut doc, false).unwrap());
    assert!(doc.attributes()[0].record_type.is_none());
}

// =============================================================================
// State Machine
// =============================================================================

/// Repeated passes over unchanged fields give identical results.
#[test]
fn test_repeated_passes_do_not_accumulate() {
    let engine = engine();
    let mut doc = Document::new("person").with_field(
        FieldDescriptor::attribute("age")
            .with_validation(json!([{"numeric": true}, {"range": {"min": 0}}])),
        json!("x"),
    );

    let first = engine.validate(&mut doc, false).unwrap();
    let first_errors = doc.errors().clone();
    let second = engine.validate(&mut doc, false).unwrap();

    assert_eq!(first, second);
    assert_eq!(doc.errors(), &first_errors);
    assert_eq!(doc.errors().len(), 2);
}

/// Fixing the field clears stale errors on the next pass.
#[test]
fn test_fixed_record_becomes_valid() {
    let engine = engine();
    let mut doc = user("");

    assert!(!engine.validate(&mut doc, false).unwrap());
    doc.set("name", json!("Ada"));

    assert!(engine.validate(&mut doc, false).unwrap());
    assert!(doc.errors().is_empty());
    assert_eq!(doc.status(), RecordStatus::Dirty);
}

/// Deleted records pass without running validators; errors untouched.
#[test]
fn test_deleted_record_is_not_validated() {
    let engine = engine();
    let mut doc = user("");
    doc.errors_mut().add("name", "stale");
    doc.delete();

    assert!(engine.validate(&mut doc, true).unwrap());
    assert_eq!(doc.errors().get("name"), ["stale"]);
    assert_eq!(doc.status(), RecordStatus::Deleted);

    let snap = engine.metrics().snapshot();
    assert_eq!(snap.skipped_passes, 1);
    assert_eq!(snap.rules_evaluated, 0);
}

/// A clean record that fails validation is forced dirty before invalid.
#[test]
fn test_clean_record_cannot_bypass_validation() {
    let engine = engine();
    let log = Arc::new(TransitionLog::new());
    let mut doc = user("");
    doc.subscribe(log.clone());

    assert!(!engine.validate(&mut doc, false).unwrap());

    let transitions = log.transitions();
    assert_eq!(transitions[0].signal, LifecycleSignal::BecameDirty);
    assert_eq!(transitions[0].from, RecordStatus::Clean);
    assert_eq!(transitions[0].to, RecordStatus::Dirty);
    assert_eq!(transitions[1].to, RecordStatus::Invalid);
}

/// A previously invalid record is reset before the new pass.
#[test]
fn test_invalid_record_receives_became_valid_first() {
    let engine = engine();
    let log = Arc::new(TransitionLog::new());
    let mut doc = user("");

    engine.validate(&mut doc, false).unwrap();
    doc.subscribe(log.clone());
    doc.set("name", json!("Ada"));
    engine.validate(&mut doc, false).unwrap();

    assert_eq!(log.signals(), vec![LifecycleSignal::BecameValid]);
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Unregistered rule types abort the pass and name the key.
#[test]
fn test_unknown_rule_type_aborts() {
    let engine = engine();
    let mut doc = Document::new("user").with_field(
        FieldDescriptor::attribute("email").with_validation(json!({"uniqueness": true})),
        json!("a@b.c"),
    );

    let err = engine.validate(&mut doc, false).unwrap_err();
    assert_eq!(err, ValidationEngineError::UnknownRuleType("uniqueness".into()));
    assert!(err.is_fatal());
    assert_eq!(err.code(), "FIELDGUARD_UNKNOWN_RULE_TYPE");
}

/// Dynamic validators may only answer with a string or nothing.
#[test]
fn test_dynamic_outcome_shapes() {
    let engine = ValidationEngine::builder()
        .validator(Namespace::Primary, "message", json_validator_fn(|_, value| value.clone()))
        .build()
        .unwrap();

    let mut ok = Document::new("note").with_field(
        FieldDescriptor::attribute("body").with_validation(json!({"message": true})),
        Value::Null,
    );
    assert!(engine.validate(&mut ok, false).unwrap());

    let mut failed = Document::new("note").with_field(
        FieldDescriptor::attribute("body").with_validation(json!({"message": true})),
        json!("is spam"),
    );
    assert!(!engine.validate(&mut failed, false).unwrap());
    assert_eq!(failed.errors().get("body"), ["is spam"]);

    let mut odd = Document::new("note").with_field(
        FieldDescriptor::attribute("body").with_validation(json!({"message": true})),
        json!(["not", "a", "message"]),
    );
    assert!(matches!(
        engine.validate(&mut odd, false),
        Err(ValidationEngineError::UnexpectedOutcome { .. })
    ));
}

/// An aborted pass leaves no partial errors behind and returns an
/// in-flight record to dirty, so the next pass starts clean.
#[test]
fn test_aborted_pass_does_not_leak_errors() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&calls);
    let engine = ValidationEngine::builder()
        .validator(Namespace::Primary, "presence", presence())
        .validator(
            Namespace::Primary,
            "flaky",
            json_validator_fn(move |_, _| {
                let mut calls = counter.lock().unwrap();
                *calls += 1;
                if *calls == 1 {
                    json!([1])
                } else {
                    Value::Null
                }
            }),
        )
        .build()
        .unwrap();

    let mut doc = user("")
        .with_field(
            FieldDescriptor::attribute("x").with_validation(json!({"flaky": true})),
            json!("anything"),
        )
        .with_status(RecordStatus::Dirty);

    let first = engine.validate(&mut doc, true);
    assert!(matches!(
        first,
        Err(ValidationEngineError::UnexpectedOutcome { ref rule_type, ref shape })
            if rule_type == "flaky" && shape == "array"
    ));
    assert!(doc.errors().is_empty());
    assert_eq!(doc.status(), RecordStatus::Dirty);

    assert!(!engine.validate(&mut doc, true).unwrap());
    assert_eq!(doc.errors().get("name"), ["is invalid"]);
    assert_eq!(doc.errors().len(), 1);
    assert_eq!(doc.status(), RecordStatus::Invalid);
    assert_eq!(*calls.lock().unwrap(), 2);
    assert_eq!(engine.metrics().snapshot().aborted_passes, 1);
}
