//! In-memory record
//!
//! Holds field values as JSON, declared fields, a status and an error
//! collection. Field setters mark a clean record dirty.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::collection::ErrorCollection;
use super::observer::{LifecycleObserver, Transition};
use super::types::{FieldDescriptor, LifecycleSignal, RecordStatus};
use super::Record;

/// In-memory record backed by a JSON object
pub struct Document {
    record_type: String,
    values: Map<String, Value>,
    attributes: Vec<FieldDescriptor>,
    relationships: Vec<FieldDescriptor>,
    status: RecordStatus,
    errors: ErrorCollection,
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl Document {
    /// Create a clean record of the given type with no fields
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            values: Map::new(),
            attributes: Vec::new(),
            relationships: Vec::new(),
            status: RecordStatus::Clean,
            errors: ErrorCollection::new(),
            observers: Vec::new(),
        }
    }

    /// Declare a field with its initial value
    pub fn with_field(mut self, field: FieldDescriptor, value: Value) -> Self {
        self.values.insert(field.name.clone(), value);
        if field.is_relationship() {
            self.relationships.push(field);
        } else {
            self.attributes.push(field);
        }
        self
    }

    /// Override the initial status
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// Subscribe an observer to lifecycle transitions
    pub fn subscribe(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }

    /// Set a field value. A clean record becomes dirty.
    pub fn set(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
        if self.status == RecordStatus::Clean {
            self.status = RecordStatus::Dirty;
        }
    }

    /// Mark the record deleted
    pub fn delete(&mut self) {
        self.status = RecordStatus::Deleted;
    }
}

impl Record for Document {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn get(&self, field: &str) -> Value {
        self.values.get(field).cloned().unwrap_or(Value::Null)
    }

    fn attributes(&self) -> &[FieldDescriptor] {
        &self.attributes
    }

    fn relationships(&self) -> &[FieldDescriptor] {
        &self.relationships
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn send(&mut self, signal: LifecycleSignal) {
        let from = self.status;
        self.status = from.apply(signal);

        let transition = Transition {
            record_type: self.record_type.clone(),
            signal,
            from,
            to: self.status,
        };
        for observer in &self.observers {
            observer.on_transition(&transition);
        }
    }

    fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }
}
