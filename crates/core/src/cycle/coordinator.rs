// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cycle coordinator: one runner task per phase, chained by binary gates
//!
//! Runner *i* loops: acquire `gate[i]`, bail out if the ring was stopped,
//! notify the observer, hold for the phase duration, release `gate[i+1]`.
//! Every exit path releases the next gate so a stop never strands a peer.

use super::phase::Phase;
use crate::config::ConfigError;
use crate::gate::{Fairness, Gate};
use crate::lifecycle::{Lifecycle, LifecycleError, LifecyclePhase, TaskGroup};
use crate::observer::PhaseObserver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

struct Ring {
    phases: Vec<Phase>,
    gates: Vec<Gate>,
    lifecycle: Lifecycle,
    observer: Box<dyn PhaseObserver>,
    /// 0 means unlimited
    rotation_limit: AtomicU64,
    rotations: AtomicU64,
    current: Mutex<Option<usize>>,
}

impl Ring {
    fn size(&self) -> usize {
        self.gates.len()
    }

    fn open_permits(&self) -> usize {
        self.gates.iter().map(Gate::available_permits).sum()
    }

    /// Stop the ring and open every gate once so no runner stays blocked
    fn halt(&self) -> bool {
        let first = self.lifecycle.stop();
        for gate in &self.gates {
            gate.release();
        }
        first
    }

    /// Count a finished rotation; true when the configured limit is reached
    fn complete_rotation(&self) -> bool {
        let done = self.rotations.fetch_add(1, Ordering::SeqCst) + 1;
        let limit = self.rotation_limit.load(Ordering::SeqCst);
        limit != 0 && done >= limit
    }
}

/// Drives a ring of phases in strict rotation until stopped
pub struct CycleCoordinator {
    ring: Arc<Ring>,
    tasks: TaskGroup,
}

impl CycleCoordinator {
    /// Build a ring over `phases`. Only the first gate starts open.
    pub fn new(
        phases: Vec<Phase>,
        observer: impl PhaseObserver,
    ) -> Result<Self, ConfigError> {
        if phases.is_empty() {
            return Err(ConfigError::EmptyRing);
        }
        let gates = phases
            .iter()
            .enumerate()
            .map(|(i, phase)| Gate::binary(phase.label(), Fairness::Fifo, i == 0))
            .collect();

        Ok(Self {
            ring: Arc::new(Ring {
                phases,
                gates,
                lifecycle: Lifecycle::new(),
                observer: Box::new(observer),
                rotation_limit: AtomicU64::new(0),
                rotations: AtomicU64::new(0),
                current: Mutex::new(None),
            }),
            tasks: TaskGroup::new(),
        })
    }

    /// Halt by itself after `rotations` complete rotations
    pub fn with_rotation_limit(self, rotations: u64) -> Result<Self, ConfigError> {
        if rotations == 0 {
            return Err(ConfigError::ZeroRotations);
        }
        self.ring.rotation_limit.store(rotations, Ordering::SeqCst);
        Ok(self)
    }

    /// Spawn one runner per phase on the current tokio runtime
    pub fn start(&self) -> Result<(), LifecycleError> {
        self.ring.lifecycle.begin()?;
        tracing::info!(phases = self.ring.size(), "cycle started");
        for index in 0..self.ring.size() {
            let ring = self.ring.clone();
            let name = format!("phase-{}", self.ring.phases[index].label());
            self.tasks.spawn(name, run_phase(ring, index));
        }
        Ok(())
    }

    /// Idempotent. Clears the running flag and releases every gate once.
    ///
    /// Returns true for the call that actually stopped the ring.
    pub fn stop(&self) -> bool {
        let first = self.ring.halt();
        if first {
            tracing::info!(rotations = self.rotations(), "cycle stopped");
        }
        first
    }

    pub fn is_running(&self) -> bool {
        self.ring.lifecycle.is_running()
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        self.ring.lifecycle.phase()
    }

    /// Wait until every runner has exited
    pub async fn join(&self) {
        self.tasks.join().await;
    }

    /// Return a halted ring to its initial state: first gate open, the rest closed.
    ///
    /// Waits for runners still unwinding before touching the gates.
    pub async fn reset(&self) -> Result<(), LifecycleError> {
        if self.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }
        self.tasks.join().await;
        for gate in &self.ring.gates {
            gate.drain();
        }
        self.ring.gates[0].release();
        self.ring.rotations.store(0, Ordering::SeqCst);
        *self.ring.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.ring.lifecycle.rearm();
        tracing::debug!("cycle reset");
        Ok(())
    }

    /// Free permits across the ring; a held token is not counted
    pub fn open_permits(&self) -> usize {
        self.ring.open_permits()
    }

    /// Completed rotations since the last reset
    pub fn rotations(&self) -> u64 {
        self.ring.rotations.load(Ordering::SeqCst)
    }

    /// Label of the phase that most recently became active
    pub fn current_phase(&self) -> Option<String> {
        let current = *self.ring.current.lock().unwrap_or_else(|e| e.into_inner());
        current.map(|i| self.ring.phases[i].label().to_string())
    }

    pub fn phases(&self) -> &[Phase] {
        &self.ring.phases
    }
}

impl Drop for CycleCoordinator {
    fn drop(&mut self) {
        // Runners hold their own Arc; without this they would spin forever
        self.ring.halt();
    }
}

/// Halts the ring when its runner unwinds; a missing runner would strand the token
struct Runner<'a> {
    ring: &'a Ring,
    index: usize,
}

impl Drop for Runner<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!(phase = %self.ring.phases[self.index].label(), "runner panicked, halting the ring");
            self.ring.halt();
        }
    }
}

async fn run_phase(ring: Arc<Ring>, index: usize) {
    let _runner = Runner { ring: &ring, index };
    let stop = ring.lifecycle.signal();
    let next = (index + 1) % ring.size();
    let phase = &ring.phases[index];

    loop {
        if ring.gates[index].acquire(&stop).await.is_err() {
            ring.gates[next].release();
            break;
        }
        if !ring.lifecycle.is_running() {
            // Keep the token moving for any runner still waiting
            ring.gates[next].release();
            break;
        }

        *ring.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(index);
        tracing::debug!(phase = %phase.label(), "phase active");
        ring.observer.on_phase_change(phase.label());

        let slept = stop.sleep(phase.duration()).await;
        // The last phase closes a rotation before handing the token back to
        // the first, so a limit reached here never lets the first run again
        let limit_reached = slept.is_ok() && next == 0 && ring.complete_rotation();
        if limit_reached {
            tracing::info!(rotations = ring.rotations.load(Ordering::SeqCst), "rotation limit reached");
            ring.halt();
            break;
        }
        ring.gates[next].release();
        if slept.is_err() {
            break;
        }
    }
    tracing::trace!(phase = %phase.label(), "runner exited");
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
