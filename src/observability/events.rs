//! Observable events
//!
//! Every log line emitted by the engine names one of these events.

use std::fmt;

use super::logger::Severity;

/// Observable events of the validation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Validation pass
    /// Validation pass begins
    ValidationBegin,
    /// Validation pass complete (valid or not)
    ValidationComplete,
    /// Deleted record, no validator ran
    ValidationSkippedDeleted,
    /// Pass aborted on a configuration error; errors cleared
    ValidationAborted,
    /// A rule reported a failure message
    RuleFailed,

    // Resolution
    /// No validator registered for a rule type (FATAL)
    ValidatorUnresolved,
    /// No message resolver registered, defaults in use (legal, INFO)
    MessagesUnresolved,
    /// A dynamic validator returned an unsupported result shape (FATAL)
    UnexpectedOutcome,

    // Commit
    /// Commit rejected by validation
    CommitRejected,
    /// Commit operation succeeded
    CommitComplete,
    /// Commit operation reported failure
    CommitFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ValidationBegin => "VALIDATION_BEGIN",
            Event::ValidationComplete => "VALIDATION_COMPLETE",
            Event::ValidationSkippedDeleted => "VALIDATION_SKIPPED_DELETED",
            Event::ValidationAborted => "VALIDATION_ABORTED",
            Event::RuleFailed => "RULE_FAILED",

            Event::ValidatorUnresolved => "VALIDATOR_UNRESOLVED",
            Event::MessagesUnresolved => "MESSAGES_UNRESOLVED",
            Event::UnexpectedOutcome => "UNEXPECTED_OUTCOME",

            Event::CommitRejected => "COMMIT_REJECTED",
            Event::CommitComplete => "COMMIT_COMPLETE",
            Event::CommitFailed => "COMMIT_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ValidatorUnresolved | Event::UnexpectedOutcome => Severity::Fatal,
            Event::CommitFailed | Event::ValidationAborted => Severity::Error,
            Event::CommitRejected => Severity::Warn,
            Event::RuleFailed => Severity::Trace,
            _ => Severity::Info,
        }
    }

    /// Returns true if this event aborts a validation pass
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
