//! Message resolver contract
//!
//! A resolver maps message keys ("presence", "invalid", ...) to text.
//! Absence is legal everywhere: callers fall back to a built-in default.

use std::collections::HashMap;

/// Message catalog lookup
pub trait MessageResolver: Send + Sync {
    /// Text for a key, `None` when the catalog has no entry
    fn resolve_message(&self, key: &str) -> Option<String>;
}

/// Map-backed resolver
#[derive(Debug, Clone, Default)]
pub struct StaticMessages {
    messages: HashMap<String, String>,
}

impl StaticMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a message
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }
}

impl MessageResolver for StaticMessages {
    fn resolve_message(&self, key: &str) -> Option<String> {
        self.messages
            .get(key)
            .filter(|m| !m.is_empty())
            .cloned()
    }
}

/// Resolve `key` through an optional resolver, falling back to `default`
pub fn message_or_default(
    resolver: Option<&dyn MessageResolver>,
    key: &str,
    default: &str,
) -> String {
    resolver
        .and_then(|r| r.resolve_message(key))
        .unwrap_or_else(|| default.to_string())
}
