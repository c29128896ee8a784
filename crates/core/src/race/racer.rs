// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race participants and the turn they take while holding a gate

use super::state::RaceState;
use crate::lifecycle::Lifecycle;
use crate::observer::ProgressObserver;
use crate::sampler::{clamp_pause, clamp_step, default_pauses, default_steps, Sampler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A named participant with its own step and pause generators
pub struct Racer {
    name: String,
    steps: Box<dyn Sampler>,
    pauses: Box<dyn Sampler>,
}

impl Racer {
    /// Random steps of 1..=10 and pauses of 200..=400 ms
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Box::new(default_steps()),
            pauses: Box::new(default_pauses()),
        }
    }

    pub fn with_steps(mut self, steps: impl Sampler) -> Self {
        self.steps = Box::new(steps);
        self
    }

    /// Pause samples are in milliseconds
    pub fn with_pauses(mut self, pauses: impl Sampler) -> Self {
        self.pauses = Box::new(pauses);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next step, never less than one
    pub fn next_step(&mut self) -> u64 {
        clamp_step(self.steps.sample())
    }

    pub fn next_pause(&mut self) -> Duration {
        clamp_pause(self.pauses.sample())
    }
}

impl std::fmt::Debug for Racer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Racer").field("name", &self.name).finish()
    }
}

/// One critical-section entry: advance, report, and try to claim the win.
///
/// Must be called with the coordinator's gate held.
pub(crate) fn take_turn(
    state: &RaceState,
    index: usize,
    racer: &mut Racer,
    observer: &dyn ProgressObserver,
) {
    state.record_turn();
    let step = racer.next_step();
    let distance = state.advance(index, step);
    tracing::debug!(racer = %racer.name, step, distance, "advanced");
    observer.on_progress(&format!(
        "{} advanced {} meters. Total distance: {} meters.",
        racer.name, step, distance
    ));
    if distance >= state.goal() && state.try_declare_winner(&racer.name) {
        observer.on_progress(&format!("{} won the race!", racer.name));
    }
}

/// Held by a participant task for the whole of its run.
///
/// The last seat vacated finishes the lifecycle. A seat vacated while its
/// task unwinds stops the race first, so peers blocked on a gate wake up.
pub(crate) struct Seat<'a> {
    lifecycle: &'a Lifecycle,
    active: &'a AtomicUsize,
}

impl<'a> Seat<'a> {
    pub(crate) fn take(lifecycle: &'a Lifecycle, active: &'a AtomicUsize) -> Self {
        Self { lifecycle, active }
    }
}

impl Drop for Seat<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("participant panicked, stopping the race");
            self.lifecycle.stop();
        }
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.lifecycle.finish();
        }
    }
}

#[cfg(test)]
#[path = "racer_tests.rs"]
mod tests;
