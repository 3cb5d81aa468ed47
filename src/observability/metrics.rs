//! Validation counters
//!
//! - Counters only, monotonic
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for validation passes and commit attempts
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct ValidationMetrics {
    /// Validation passes that ran validators
    passes: AtomicU64,
    /// Passes that left errors behind
    failed_passes: AtomicU64,
    /// Passes skipped because the record was deleted
    skipped_passes: AtomicU64,
    /// Passes aborted on a configuration error
    aborted_passes: AtomicU64,
    /// Validator invocations
    rules_evaluated: AtomicU64,
    /// Validator invocations that reported a message
    rule_failures: AtomicU64,
    /// Commit operations that succeeded
    commits: AtomicU64,
    /// Commits refused because validation failed
    commits_rejected: AtomicU64,
    /// Commit operations that reported failure
    commit_failures: AtomicU64,
}

impl ValidationMetrics {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_passes(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed_passes(&self) {
        self.failed_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_skipped_passes(&self) {
        self.skipped_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_aborted_passes(&self) {
        self.aborted_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rules_evaluated(&self) {
        self.rules_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rule_failures(&self) {
        self.rule_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_commits(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_commits_rejected(&self) {
        self.commits_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_commit_failures(&self) {
        self.commit_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values as one JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            failed_passes: self.failed_passes.load(Ordering::Relaxed),
            skipped_passes: self.skipped_passes.load(Ordering::Relaxed),
            aborted_passes: self.aborted_passes.load(Ordering::Relaxed),
            rules_evaluated: self.rules_evaluated.load(Ordering::Relaxed),
            rule_failures: self.rule_failures.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            commits_rejected: self.commits_rejected.load(Ordering::Relaxed),
            commit_failures: self.commit_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub passes: u64,
    pub failed_passes: u64,
    pub skipped_passes: u64,
    pub aborted_passes: u64,
    pub rules_evaluated: u64,
    pub rule_failures: u64,
    pub commits: u64,
    pub commits_rejected: u64,
    pub commit_failures: u64,
}
