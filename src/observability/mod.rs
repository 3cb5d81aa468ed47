//! Observability for the validation engine
//!
//! - Structured logging (JSON lines, WARN and above by default)
//! - Typed events
//! - Atomic counters
//!
//! Observability is read-only: nothing here changes a validation outcome.
//!
//! # Usage
//!
//! ```ignore
//! use fieldguard::observability::{log_event, Event, ValidationMetrics};
//!
//! log_event(Event::RuleFailed, &[("field", "name"), ("rule", "presence")]);
//!
//! let metrics = ValidationMetrics::new();
//! metrics.increment_passes();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, ValidationMetrics};

#[cfg(test)]
pub(crate) use logger::capture_events;

/// Log an event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
