//! Validation subsystem
//!
//! Orchestrates declarative per-field validation of records:
//! rule resolution, validator lookup with namespaced fallback, message
//! resolution with defaults, error aggregation, the validity state machine
//! and the commit guard.
//!
//! # Design Principles
//!
//! - Registries are injected, never looked up from global state
//! - Validators are built fresh for every rule, never cached
//! - A field runs all of its rules; failures accumulate
//! - Unknown rule types abort the pass; missing messages fall back
//! - Deleted records are never validated

mod commit;
mod engine;
mod errors;
mod messages;
mod registry;
mod rules;
mod validator;

pub use commit::{CommitOperation, CommitResult, SaveOptions};
pub use engine::{ValidationEngine, ValidationEngineBuilder};
pub use errors::{CommitError, SaveError, ValidationEngineError, ValidationError, ValidationResult};
pub use messages::{message_or_default, MessageResolver, StaticMessages};
pub use registry::{
    register_messages, register_validator, resolve_message_resolver, resolve_validator_factory,
    MessageRegistry, NameRegistry, Namespace, ValidatorRegistry,
};
pub use rules::{normalize_rule_value, resolve_rules, rule_key, RuleDescriptor};
pub use validator::{
    json_validator_fn, record_validator_fn, validator_fn, FnValidator, Validator,
    ValidatorConfig, ValidatorFactory, ValidatorOutcome,
};
