// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer callbacks invoked from inside a held gate
//!
//! Observers run synchronously while the caller owns the turn, so they must
//! return promptly: a slow observer stalls the whole rotation.

use std::sync::{Arc, Mutex};

/// Notified each time a ring phase becomes active
pub trait PhaseObserver: Send + Sync + 'static {
    fn on_phase_change(&self, phase: &str);
}

/// Notified with free-form progress messages from race and lab participants
pub trait ProgressObserver: Send + Sync + 'static {
    fn on_progress(&self, message: &str);

    /// Called when a participant starts (`true`) or stops (`false`) using a shared resource
    fn on_activity(&self, _active: bool) {}
}

impl<F> PhaseObserver for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn on_phase_change(&self, phase: &str) {
        self(phase)
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn on_progress(&self, message: &str) {
        self(message)
    }
}

/// Logs every notification through `tracing`
#[derive(Clone, Debug, Default)]
pub struct TracingObserver;

impl PhaseObserver for TracingObserver {
    fn on_phase_change(&self, phase: &str) {
        tracing::info!(phase = %phase, "phase change");
    }
}

impl ProgressObserver for TracingObserver {
    fn on_progress(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Records notifications in arrival order
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
    active: Arc<Mutex<ActivityCounts>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub current: usize,
    pub peak: usize,
    pub started: usize,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn activity(&self) -> ActivityCounts {
        *self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, event: &str) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.to_string());
    }
}

impl PhaseObserver for RecordingObserver {
    fn on_phase_change(&self, phase: &str) {
        self.record(phase);
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, message: &str) {
        self.record(message);
    }

    fn on_activity(&self, active: bool) {
        let mut counts = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active {
            counts.current += 1;
            counts.started += 1;
            counts.peak = counts.peak.max(counts.current);
        } else {
            counts.current = counts.current.saturating_sub(1);
        }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
