//! Record type definitions
//!
//! Statuses:
//! - clean: persisted, unchanged
//! - dirty: changed since last commit
//! - in-flight: commit in progress
//! - invalid: last validation pass left errors
//! - deleted: never validated again

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Clean,
    Dirty,
    InFlight,
    Invalid,
    Deleted,
}

impl RecordStatus {
    /// Returns the status name
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Clean => "clean",
            RecordStatus::Dirty => "dirty",
            RecordStatus::InFlight => "in_flight",
            RecordStatus::Invalid => "invalid",
            RecordStatus::Deleted => "deleted",
        }
    }

    /// Status reached from `self` when `signal` is received.
    ///
    /// Deleted is terminal. Signals that do not apply leave the status as is.
    pub fn apply(self, signal: LifecycleSignal) -> RecordStatus {
        use LifecycleSignal::*;
        use RecordStatus::*;

        match (self, signal) {
            (Deleted, _) => Deleted,
            (Invalid, BecameValid) => Dirty,
            (Clean | Dirty, WillCommit) => InFlight,
            (_, BecameDirty) => Dirty,
            (_, BecameInvalid) => Invalid,
            (_, DidCommit) => Clean,
            (InFlight, CommitFailed) => Dirty,
            (status, _) => status,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signals the engine sends to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleSignal {
    /// Previous failures are being reset before a new pass
    BecameValid,
    /// A commit attempt is starting
    WillCommit,
    /// Validation failed; the record must not look saved
    BecameDirty,
    /// The error collection holds failures
    BecameInvalid,
    /// Commit operation succeeded
    DidCommit,
    /// Commit operation reported failure
    CommitFailed,
}

impl LifecycleSignal {
    /// Returns the signal name
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleSignal::BecameValid => "became_valid",
            LifecycleSignal::WillCommit => "will_commit",
            LifecycleSignal::BecameDirty => "became_dirty",
            LifecycleSignal::BecameInvalid => "became_invalid",
            LifecycleSignal::DidCommit => "did_commit",
            LifecycleSignal::CommitFailed => "commit_failed",
        }
    }
}

impl fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a field is a plain attribute or a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Attribute,
    Relationship,
}

/// An attribute or relationship declared on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Attribute or relationship
    pub kind: FieldKind,
    /// Declared rules: absent, one rule object, or a list of rule objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    /// Owning record type, stamped by the engine before validators run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
}

impl FieldDescriptor {
    /// Declare an attribute without rules
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Attribute,
            validation: None,
            record_type: None,
        }
    }

    /// Declare a relationship without rules
    pub fn relationship(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Relationship,
            validation: None,
            record_type: None,
        }
    }

    /// Attach a rule declaration
    pub fn with_validation(mut self, validation: Value) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn is_relationship(&self) -> bool {
        self.kind == FieldKind::Relationship
    }
}
