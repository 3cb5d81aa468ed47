//! Commit guard
//!
//! `save` validates (unless told not to) and only then hands the record to
//! the commit operation. A refused commit is an `Err` carrying a
//! [`ValidationError`]; the commit operation is never invoked for it.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use super::engine::ValidationEngine;
use super::errors::{CommitError, SaveError, ValidationError};
use super::messages::message_or_default;
use crate::observability::{log_event, Event};
use crate::record::{LifecycleSignal, Record};

/// Result of the external commit operation
pub type CommitResult = Result<Value, CommitError>;

/// Persists a record (network, storage); external to the engine
pub trait CommitOperation: Send + Sync {
    fn commit<'a>(
        &'a self,
        record: &'a dyn Record,
    ) -> Pin<Box<dyn Future<Output = CommitResult> + Send + 'a>>;
}

/// Options for [`ValidationEngine::save_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Run a validation pass before committing (default: true)
    pub validate: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl SaveOptions {
    /// Commit without running validators
    pub fn without_validation() -> Self {
        Self { validate: false }
    }
}

impl ValidationEngine {
    /// Validate, then commit.
    pub async fn save(
        &self,
        record: &mut dyn Record,
        commit: &dyn CommitOperation,
    ) -> Result<Value, SaveError> {
        self.save_with(record, commit, SaveOptions::default()).await
    }

    /// Validate unless `options.validate` is false, then commit.
    ///
    /// # Errors
    ///
    /// - `SaveError::Invalid` when validation fails; nothing is committed
    /// - `SaveError::Engine` when the validation pass aborts
    /// - `SaveError::Commit` when the commit operation fails
    pub async fn save_with(
        &self,
        record: &mut dyn Record,
        commit: &dyn CommitOperation,
        options: SaveOptions,
    ) -> Result<Value, SaveError> {
        if options.validate && !self.validate(record, true)? {
            return Err(self.reject(&*record).into());
        }

        let outcome = commit.commit(&*record).await;
        match outcome {
            Ok(value) => {
                self.metrics().increment_commits();
                record.send(LifecycleSignal::DidCommit);
                log_event(
                    Event::CommitComplete,
                    &[("record_type", record.record_type())],
                );
                Ok(value)
            }
            Err(err) => {
                self.metrics().increment_commit_failures();
                record.send(LifecycleSignal::CommitFailed);
                let reason = err.to_string();
                log_event(
                    Event::CommitFailed,
                    &[
                        ("reason", reason.as_str()),
                        ("record_type", record.record_type()),
                    ],
                );
                Err(SaveError::Commit(err))
            }
        }
    }

    /// Build the aggregate for a refused commit
    fn reject(&self, record: &dyn Record) -> ValidationError {
        let resolver = self.message_resolver();
        let message = message_or_default(
            resolver.as_deref(),
            &self.config().generic_message_key,
            &self.config().default_generic_message,
        );
        let rejection = ValidationError::new(message, record.errors().clone());

        self.metrics().increment_commits_rejected();
        let id = rejection.id().to_string();
        let fields = record.errors().fields().collect::<Vec<_>>().join(",");
        log_event(
            Event::CommitRejected,
            &[
                ("fields", fields.as_str()),
                ("id", id.as_str()),
                ("record_type", record.record_type()),
            ],
        );
        rejection
    }
}
