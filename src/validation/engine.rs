//! Validation engine
//!
//! One pass over a record:
//! 1. A record marked invalid receives `BecameValid` and its errors are cleared
//! 2. A deleted record passes without running any validator
//! 3. With `will_commit`, the record receives `WillCommit`
//! 4. Every attribute, then every relationship, runs its rules
//! 5. Valid iff the error collection is empty
//! 6. Otherwise the record receives `BecameDirty` then `BecameInvalid`
//!
//! A pass aborted by a configuration error clears the error collection and,
//! when `WillCommit` was sent, returns the record to dirty with
//! `CommitFailed`.
//!
//! Passes are synchronous. Callers must not run two passes on the same
//! record concurrently; `&mut` access to the record enforces that here.

use std::sync::Arc;

use super::errors::{ValidationEngineError, ValidationResult};
use super::messages::MessageResolver;
use super::registry::{
    register_messages, register_validator, resolve_message_resolver, resolve_validator_factory,
    MessageRegistry, Namespace, ValidatorRegistry,
};
use super::rules::{normalize_rule_value, resolve_rules, rule_key, RuleDescriptor};
use super::validator::{Validator, ValidatorConfig, ValidatorFactory, ValidatorOutcome};
use crate::config::EngineConfig;
use crate::observability::{log_event, Event, ValidationMetrics};
use crate::record::{FieldDescriptor, LifecycleSignal, Record};

/// Resolves, builds and runs validators for records
pub struct ValidationEngine {
    config: EngineConfig,
    validators: ValidatorRegistry,
    messages: MessageRegistry,
    metrics: Arc<ValidationMetrics>,
}

impl ValidationEngine {
    /// Create an engine from explicit registries
    pub fn new(
        config: EngineConfig,
        validators: ValidatorRegistry,
        messages: MessageRegistry,
    ) -> ValidationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            validators,
            messages,
            metrics: Arc::new(ValidationMetrics::new()),
        })
    }

    pub fn builder() -> ValidationEngineBuilder {
        ValidationEngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<ValidationMetrics> {
        &self.metrics
    }

    /// Message resolver under the primary name, else the vendored name
    pub fn message_resolver(&self) -> Option<Arc<dyn MessageResolver>> {
        resolve_message_resolver(&self.messages, &self.config)
    }

    /// Build a fresh validator for one rule descriptor.
    ///
    /// # Errors
    ///
    /// `UnknownRuleType` when no factory is registered for the rule type.
    pub fn build_validator(
        &self,
        rule: &RuleDescriptor,
        message_resolver: Option<Arc<dyn MessageResolver>>,
    ) -> ValidationResult<Box<dyn Validator>> {
        let factory: ValidatorFactory =
            resolve_validator_factory(&self.validators, &self.config, &rule.rule_type)?;

        let config = ValidatorConfig {
            rule_type: rule.rule_type.clone(),
            key: rule_key(&rule.rule_type),
            options: normalize_rule_value(&rule.rule_type, &rule.rule_value),
            attribute: rule.field.clone(),
            message_resolver,
            default_message: self.config.default_field_message.clone(),
        };
        Ok(factory(config))
    }

    /// Run every rule declared on `field` and record failures.
    ///
    /// All validators are built before any runs, so an unknown rule type
    /// aborts before the field gains errors. Rules are not short-circuited.
    pub fn validate_field(
        &self,
        record: &mut dyn Record,
        field: &FieldDescriptor,
        message_resolver: Option<Arc<dyn MessageResolver>>,
    ) -> ValidationResult<()> {
        let rules = resolve_rules(field)?;
        if rules.is_empty() {
            return Ok(());
        }

        let validators = rules
            .iter()
            .map(|rule| self.build_validator(rule, message_resolver.clone()))
            .collect::<ValidationResult<Vec<_>>>()?;

        let mut field = field.clone();
        field.record_type = Some(record.record_type().to_string());
        let value = record.get(&field.name);

        for (rule, validator) in rules.iter().zip(validators) {
            self.metrics.increment_rules_evaluated();
            let outcome = validator
                .validate(&field.name, &value, &field, &*record)
                .map_err(|err| {
                    if let ValidationEngineError::UnexpectedOutcome { rule_type, shape } = &err {
                        log_event(
                            Event::UnexpectedOutcome,
                            &[
                                ("field", field.name.as_str()),
                                ("record_type", record.record_type()),
                                ("rule_type", rule_type.as_str()),
                                ("shape", shape.as_str()),
                            ],
                        );
                    }
                    err
                })?;

            if let ValidatorOutcome::Failed(message) = outcome {
                if message.is_empty() {
                    continue;
                }
                self.metrics.increment_rule_failures();
                log_event(
                    Event::RuleFailed,
                    &[
                        ("field", field.name.as_str()),
                        ("message", message.as_str()),
                        ("record_type", record.record_type()),
                        ("rule", rule.rule_type.as_str()),
                    ],
                );
                record.errors_mut().add(field.name.as_str(), message);
            }
        }

        Ok(())
    }

    /// Run a full validation pass, returning whether the record is valid.
    ///
    /// # Errors
    ///
    /// Configuration errors (unknown rule type, malformed declaration,
    /// unsupported validator result) abort the pass.
    pub fn validate(&self, record: &mut dyn Record, will_commit: bool) -> ValidationResult<bool> {
        if !record.is_valid() {
            record.send(LifecycleSignal::BecameValid);
            record.errors_mut().clear();
        }

        if record.is_deleted() {
            self.metrics.increment_skipped_passes();
            log_event(
                Event::ValidationSkippedDeleted,
                &[("record_type", record.record_type())],
            );
            return Ok(true);
        }

        let will_commit_str = if will_commit { "true" } else { "false" };
        log_event(
            Event::ValidationBegin,
            &[
                ("record_type", record.record_type()),
                ("will_commit", will_commit_str),
            ],
        );

        if will_commit {
            record.send(LifecycleSignal::WillCommit);
        }

        if let Err(err) = self.validate_fields(record) {
            self.abort_pass(record, will_commit, &err);
            return Err(err);
        }

        self.metrics.increment_passes();
        let is_valid = record.errors().is_empty();
        if !is_valid {
            self.metrics.increment_failed_passes();
            record.send(LifecycleSignal::BecameDirty);
            record.send(LifecycleSignal::BecameInvalid);
        }

        let error_count = record.errors().len().to_string();
        log_event(
            Event::ValidationComplete,
            &[
                ("errors", error_count.as_str()),
                ("record_type", record.record_type()),
                ("valid", if is_valid { "true" } else { "false" }),
            ],
        );

        Ok(is_valid)
    }

    /// Attributes first, then relationships
    fn validate_fields(&self, record: &mut dyn Record) -> ValidationResult<()> {
        let message_resolver = self.message_resolver();
        let fields: Vec<FieldDescriptor> = record
            .attributes()
            .iter()
            .chain(record.relationships())
            .cloned()
            .collect();

        for field in &fields {
            self.validate_field(record, field, message_resolver.clone())?;
        }
        Ok(())
    }

    /// Undo a partial pass so the next one starts clean
    fn abort_pass(&self, record: &mut dyn Record, will_commit: bool, err: &ValidationEngineError) {
        record.errors_mut().clear();
        if will_commit {
            record.send(LifecycleSignal::CommitFailed);
        }

        self.metrics.increment_aborted_passes();
        let reason = err.to_string();
        log_event(
            Event::ValidationAborted,
            &[
                ("code", err.code()),
                ("reason", reason.as_str()),
                ("record_type", record.record_type()),
            ],
        );
    }
}

/// Builder registering providers under the configured names
pub struct ValidationEngineBuilder {
    config: EngineConfig,
    validators: Vec<(Namespace, String, ValidatorFactory)>,
    messages: Vec<(Namespace, Arc<dyn MessageResolver>)>,
}

impl ValidationEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            validators: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a validator factory for a rule type
    pub fn validator(
        mut self,
        namespace: Namespace,
        rule_type: impl Into<String>,
        factory: ValidatorFactory,
    ) -> Self {
        self.validators.push((namespace, rule_type.into(), factory));
        self
    }

    /// Register a message resolver
    pub fn messages(mut self, namespace: Namespace, resolver: Arc<dyn MessageResolver>) -> Self {
        self.messages.push((namespace, resolver));
        self
    }

    /// Build the engine. Names are derived from the final configuration.
    pub fn build(self) -> ValidationResult<ValidationEngine> {
        self.config.validate()?;

        let mut validators = ValidatorRegistry::new();
        for (namespace, rule_type, factory) in self.validators {
            register_validator(&mut validators, &self.config, namespace, &rule_type, factory);
        }

        let mut messages = MessageRegistry::new();
        for (namespace, resolver) in self.messages {
            register_messages(&mut messages, &self.config, namespace, resolver);
        }

        ValidationEngine::new(self.config, validators, messages)
    }
}

impl Default for ValidationEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
