//! Name registries with two-tier fallback
//!
//! Providers are registered by name. Lookups try the primary name, then the
//! vendored name:
//! - message resolvers: absence is legal, defaults take over
//! - validator factories: absence aborts the pass

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::errors::{ValidationEngineError, ValidationResult};
use super::messages::MessageResolver;
use super::validator::ValidatorFactory;
use crate::config::EngineConfig;
use crate::observability::{log_event, Event};

/// Which name a provider is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Application-provided, consulted first
    Primary,
    /// Bundled fallback
    Vendored,
}

/// Name → provider lookup
pub struct NameRegistry<T> {
    providers: HashMap<String, T>,
}

impl<T: Clone> NameRegistry<T> {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider, replacing any previous one under the same name
    pub fn register(&mut self, name: impl Into<String>, provider: T) {
        self.providers.insert(name.into(), provider);
    }

    pub fn lookup(&self, name: &str) -> Option<T> {
        self.providers.get(name).cloned()
    }

    /// First hit among `names`, in order
    pub fn lookup_first<S: AsRef<str>>(&self, names: &[S]) -> Option<T> {
        names.iter().find_map(|name| self.lookup(name.as_ref()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<T: Clone> Default for NameRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NameRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("NameRegistry").field("names", &names).finish()
    }
}

/// Validator factories keyed by namespaced name
pub type ValidatorRegistry = NameRegistry<ValidatorFactory>;

/// Message resolvers keyed by name
pub type MessageRegistry = NameRegistry<Arc<dyn MessageResolver>>;

/// Register a validator factory for a rule type under a namespace
pub fn register_validator(
    registry: &mut ValidatorRegistry,
    config: &EngineConfig,
    namespace: Namespace,
    rule_type: &str,
    factory: ValidatorFactory,
) {
    let [primary, vendored] = config.validator_names(rule_type);
    let name = match namespace {
        Namespace::Primary => primary,
        Namespace::Vendored => vendored,
    };
    registry.register(name, factory);
}

/// Register a message resolver under a namespace
pub fn register_messages(
    registry: &mut MessageRegistry,
    config: &EngineConfig,
    namespace: Namespace,
    resolver: Arc<dyn MessageResolver>,
) {
    let [primary, vendored] = config.message_names();
    let name = match namespace {
        Namespace::Primary => primary,
        Namespace::Vendored => vendored,
    };
    registry.register(name, resolver);
}

/// Message resolver from the primary name, else the vendored name.
pub fn resolve_message_resolver(
    registry: &MessageRegistry,
    config: &EngineConfig,
) -> Option<Arc<dyn MessageResolver>> {
    let names = config.message_names();
    let resolver = registry.lookup_first(&names);
    if resolver.is_none() {
        log_event(
            Event::MessagesUnresolved,
            &[("primary", names[0]), ("vendored", names[1])],
        );
    }
    resolver
}

/// Validator factory for `rule_type` from the primary name, else the
/// vendored name.
///
/// # Errors
///
/// `UnknownRuleType` when neither name is registered. This is a
/// configuration error and must abort the pass.
pub fn resolve_validator_factory(
    registry: &ValidatorRegistry,
    config: &EngineConfig,
    rule_type: &str,
) -> ValidationResult<ValidatorFactory> {
    let names = config.validator_names(rule_type);
    registry.lookup_first(&names).ok_or_else(|| {
        log_event(Event::ValidatorUnresolved, &[("rule_type", rule_type)]);
        ValidationEngineError::UnknownRuleType(rule_type.to_string())
    })
}
