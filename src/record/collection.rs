//! Error collection
//!
//! Field name → ordered failure messages. A field present in the map always
//! has at least one message, so emptiness is "no field has entries".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-record mapping from field name to accumulated failure messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    messages: BTreeMap<String, Vec<String>>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field. Earlier messages are kept.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages for a field, in insertion order
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a field has any messages
    pub fn has(&self, field: &str) -> bool {
        self.messages.contains_key(field)
    }

    /// Remove every message for every field
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total number of messages across fields
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Fields with at least one message
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// "field message" strings, e.g. "name can't be blank"
    pub fn full_messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| format!("{} {}", field, m))
            })
            .collect()
    }
}
