// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start/stop semantics shared by every coordinator
//!
//! Provides:
//! - **Lifecycle** - `Idle -> Running -> Halted` state plus a published stop flag
//! - **StopSignal** - cheap handle participants race against at every suspension point
//! - **TaskGroup** - spawn/join bookkeeping for participant tasks

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// A stop request interrupted a blocking acquire or a sleep.
///
/// Not a failure: the caller performs its cleanup release and leaves its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled by stop request")]
pub struct Cancelled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("coordinator is already running")]
    AlreadyRunning,
    #[error("coordinator has run to completion; reset it before starting again")]
    NeedsReset,
}

/// Where a coordinator is in its run-once lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    Running,
    Halted,
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecyclePhase::Idle => write!(f, "idle"),
            LifecyclePhase::Running => write!(f, "running"),
            LifecyclePhase::Halted => write!(f, "halted"),
        }
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    phase: Mutex<LifecyclePhase>,
    stop_tx: watch::Sender<bool>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            phase: Mutex::new(LifecyclePhase::Idle),
            stop_tx,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.phase() == LifecyclePhase::Running
    }

    /// Move from `Idle` to `Running`
    pub fn begin(&self) -> Result<(), LifecycleError> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        match *phase {
            LifecyclePhase::Idle => {
                *phase = LifecyclePhase::Running;
                Ok(())
            }
            LifecyclePhase::Running => Err(LifecycleError::AlreadyRunning),
            LifecyclePhase::Halted => Err(LifecycleError::NeedsReset),
        }
    }

    /// Halt and publish the stop flag.
    ///
    /// Returns true only for the call that performed the transition.
    pub fn stop(&self) -> bool {
        let previous = {
            let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *phase, LifecyclePhase::Halted)
        };
        let already_stopped = self.stop_tx.send_replace(true);
        let first = previous != LifecyclePhase::Halted || !already_stopped;
        if first {
            tracing::info!(from = %previous, "stop requested");
        }
        first
    }

    /// Natural completion: `Running -> Halted` without publishing a stop
    pub fn finish(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if *phase == LifecyclePhase::Running {
            *phase = LifecyclePhase::Halted;
            tracing::debug!("run finished");
        }
    }

    /// Back to `Idle` with the stop flag cleared. Only valid between runs.
    pub fn rearm(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        *phase = LifecyclePhase::Idle;
        self.stop_tx.send_replace(false);
    }

    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: Some(self.stop_tx.subscribe()),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`Lifecycle`] stop flag
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl StopSignal {
    /// A signal that never fires, for callers with nothing to cancel them
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_stopped(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once a stop is published or the owning lifecycle is gone
    pub async fn cancelled(&self) {
        match &self.rx {
            Some(rx) => {
                let mut rx = rx.clone();
                let _ = rx.wait_for(|stopped| *stopped).await;
            }
            None => std::future::pending().await,
        }
    }

    /// Sleep for `duration` unless a stop arrives first.
    ///
    /// A zero duration returns immediately.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = self.cancelled() => Err(Cancelled),
        }
    }
}

/// Join handles of the tasks spawned for one run
#[derive(Debug, Default)]
pub struct TaskGroup {
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task on the current runtime inside a span named after it
    pub fn spawn<F>(&self, name: impl Into<String>, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let span = tracing::debug_span!("task", name = %name);
        let handle = tokio::spawn(task.instrument(span));
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name, handle));
    }

    pub fn len(&self) -> usize {
        self.handles.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every spawned task to terminate.
    ///
    /// A panicked task is logged, not propagated. Cancel-safe: handles not yet
    /// joined go back to the group when the future is dropped.
    pub async fn join(&self) {
        let mut pending = Pending {
            group: self,
            handles: std::mem::take(&mut *self.handles.lock().unwrap_or_else(|e| e.into_inner())),
        };
        while let Some((name, handle)) = pending.handles.last_mut() {
            if let Err(e) = handle.await {
                tracing::error!(task = %name, error = %e, "task terminated abnormally");
            }
            pending.handles.pop();
        }
    }
}

struct Pending<'a> {
    group: &'a TaskGroup,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            self.group
                .handles
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .append(&mut self.handles);
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
