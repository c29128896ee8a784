// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-gate cycle: one runner and one gate
//!
//! The gate guards only the observer call. The hold and the move to the next
//! phase happen outside it, so phase order comes from the runner's own loop
//! rather than from a token handed between gates.

use super::phase::Phase;
use crate::config::ConfigError;
use crate::gate::{Fairness, Gate};
use crate::lifecycle::{Lifecycle, LifecycleError, LifecyclePhase, TaskGroup};
use crate::observer::PhaseObserver;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

struct Light {
    phases: Vec<Phase>,
    gate: Gate,
    lifecycle: Lifecycle,
    observer: Box<dyn PhaseObserver>,
    current: AtomicUsize,
    /// 0 means unlimited
    rotation_limit: AtomicU64,
    rotations: AtomicU64,
}

impl Light {
    fn phase(&self, index: usize) -> &Phase {
        &self.phases[index % self.phases.len()]
    }
}

pub struct SingleGateCycle {
    light: Arc<Light>,
    tasks: TaskGroup,
}

impl SingleGateCycle {
    pub fn new(phases: Vec<Phase>, observer: impl PhaseObserver) -> Result<Self, ConfigError> {
        if phases.is_empty() {
            return Err(ConfigError::EmptyRing);
        }
        Ok(Self {
            light: Arc::new(Light {
                phases,
                gate: Gate::binary("light", Fairness::Fifo, true),
                lifecycle: Lifecycle::new(),
                observer: Box::new(observer),
                current: AtomicUsize::new(0),
                rotation_limit: AtomicU64::new(0),
                rotations: AtomicU64::new(0),
            }),
            tasks: TaskGroup::new(),
        })
    }

    pub fn with_rotation_limit(self, rotations: u64) -> Result<Self, ConfigError> {
        if rotations == 0 {
            return Err(ConfigError::ZeroRotations);
        }
        self.light.rotation_limit.store(rotations, Ordering::SeqCst);
        Ok(self)
    }

    pub fn start(&self) -> Result<(), LifecycleError> {
        self.light.lifecycle.begin()?;
        tracing::info!(phases = self.light.phases.len(), "single-gate cycle started");
        self.tasks.spawn("light", run_light(self.light.clone()));
        Ok(())
    }

    /// Idempotent; wakes the runner out of its hold
    pub fn stop(&self) -> bool {
        self.light.lifecycle.stop()
    }

    pub fn is_running(&self) -> bool {
        self.light.lifecycle.is_running()
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        self.light.lifecycle.phase()
    }

    pub async fn join(&self) {
        self.tasks.join().await;
    }

    /// Back to the first phase with the gate open
    pub async fn reset(&self) -> Result<(), LifecycleError> {
        if self.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }
        self.tasks.join().await;
        self.light.gate.drain();
        self.light.gate.release();
        self.light.current.store(0, Ordering::SeqCst);
        self.light.rotations.store(0, Ordering::SeqCst);
        self.light.lifecycle.rearm();
        tracing::debug!("single-gate cycle reset");
        Ok(())
    }

    /// Label of the phase being shown or held; the first phase before a run
    pub fn current_phase(&self) -> &str {
        self.light
            .phase(self.light.current.load(Ordering::SeqCst))
            .label()
    }

    pub fn rotations(&self) -> u64 {
        self.light.rotations.load(Ordering::SeqCst)
    }

    pub fn open_permits(&self) -> usize {
        self.light.gate.available_permits()
    }

    pub fn phases(&self) -> &[Phase] {
        &self.light.phases
    }
}

impl Drop for SingleGateCycle {
    fn drop(&mut self) {
        self.light.lifecycle.stop();
    }
}

/// Settles the lifecycle however the runner leaves its loop
struct Runner<'a> {
    light: &'a Light,
}

impl Drop for Runner<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("light runner panicked");
            self.light.lifecycle.stop();
        } else {
            self.light.lifecycle.finish();
        }
    }
}

async fn run_light(light: Arc<Light>) {
    let _runner = Runner { light: &light };
    let stop = light.lifecycle.signal();
    let count = light.phases.len();

    loop {
        let Ok(permit) = light.gate.enter(&stop).await else {
            break;
        };
        if !light.lifecycle.is_running() {
            break;
        }
        let index = light.current.load(Ordering::SeqCst);
        let phase = light.phase(index);
        tracing::debug!(phase = %phase.label(), "phase active");
        light.observer.on_phase_change(phase.label());
        drop(permit);

        if stop.sleep(phase.duration()).await.is_err() || !light.lifecycle.is_running() {
            break;
        }
        if index + 1 == count {
            let done = light.rotations.fetch_add(1, Ordering::SeqCst) + 1;
            let limit = light.rotation_limit.load(Ordering::SeqCst);
            if limit != 0 && done >= limit {
                tracing::info!(rotations = done, "rotation limit reached");
                break;
            }
        }
        light.current.store((index + 1) % count, Ordering::SeqCst);
    }
    tracing::trace!("light runner exited");
}

#[cfg(test)]
#[path = "single_tests.rs"]
mod tests;
