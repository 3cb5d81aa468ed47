//! Record subsystem
//!
//! The validation engine never owns a record. It reaches one through the
//! [`Record`] capability set: field values, declared fields, status signals
//! and the error collection.

mod collection;
mod document;
mod observer;
mod types;

pub use collection::ErrorCollection;
pub use document::Document;
pub use observer::{LifecycleObserver, Transition, TransitionLog};
pub use types::{FieldDescriptor, FieldKind, LifecycleSignal, RecordStatus};

use serde_json::Value;

/// Capabilities a record exposes to the validation engine
pub trait Record: Send + Sync {
    /// Type identifier used in messages and logs
    fn record_type(&self) -> &str;

    /// Current value of a field, `Null` when unset
    fn get(&self, field: &str) -> Value;

    /// Declared attributes, in declaration order
    fn attributes(&self) -> &[FieldDescriptor];

    /// Declared relationships, in declaration order
    fn relationships(&self) -> &[FieldDescriptor];

    fn status(&self) -> RecordStatus;

    /// Deliver a lifecycle signal
    fn send(&mut self, signal: LifecycleSignal);

    fn errors(&self) -> &ErrorCollection;

    fn errors_mut(&mut self) -> &mut ErrorCollection;

    /// False once a validation pass has marked the record invalid
    fn is_valid(&self) -> bool {
        self.status() != RecordStatus::Invalid
    }

    fn is_deleted(&self) -> bool {
        self.status() == RecordStatus::Deleted
    }
}
