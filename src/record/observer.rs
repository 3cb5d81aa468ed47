//! Lifecycle observers
//!
//! Subscribers are notified after every signal a record receives,
//! including signals that leave the status unchanged.

use std::sync::Mutex;

use super::types::{LifecycleSignal, RecordStatus};

/// A lifecycle transition as seen by observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub record_type: String,
    pub signal: LifecycleSignal,
    pub from: RecordStatus,
    pub to: RecordStatus,
}

/// Subscriber to record lifecycle signals (UI bindings, persistence hooks)
pub trait LifecycleObserver: Send + Sync {
    fn on_transition(&self, transition: &Transition);
}

/// Observer that keeps every transition it sees
#[derive(Debug, Default)]
pub struct TransitionLog {
    transitions: Mutex<Vec<Transition>>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions seen so far, oldest first
    pub fn transitions(&self) -> Vec<Transition> {
        self.transitions
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Signals seen so far, oldest first
    pub fn signals(&self) -> Vec<LifecycleSignal> {
        self.transitions().iter().map(|t| t.signal).collect()
    }
}

impl LifecycleObserver for TransitionLog {
    fn on_transition(&self, transition: &Transition) {
        if let Ok(mut transitions) = self.transitions.lock() {
            transitions.push(transition.clone());
        }
    }
}
