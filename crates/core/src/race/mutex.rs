// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! N-participant race behind a single binary gate
//!
//! Turn order is whatever the gate's fairness yields; only mutual exclusion
//! of the advance step is guaranteed.

use super::racer::{take_turn, Racer, Seat};
use super::state::{RaceState, RaceSummary};
use crate::config::ConfigError;
use crate::gate::{Fairness, Gate};
use crate::lifecycle::{Lifecycle, LifecycleError, LifecyclePhase, TaskGroup};
use crate::observer::ProgressObserver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

struct Track {
    gate: Gate,
    state: RaceState,
    lifecycle: Lifecycle,
    observer: Box<dyn ProgressObserver>,
    names: Mutex<Vec<String>>,
    active: AtomicUsize,
}

pub struct SimpleMutexCoordinator {
    track: Arc<Track>,
    tasks: TaskGroup,
}

impl SimpleMutexCoordinator {
    pub fn new(
        goal: u64,
        participants: usize,
        fairness: Fairness,
        observer: impl ProgressObserver,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            track: Arc::new(Track {
                gate: Gate::binary("track", fairness, true),
                state: RaceState::new(goal, participants)?,
                lifecycle: Lifecycle::new(),
                observer: Box::new(observer),
                names: Mutex::new(Vec::new()),
                active: AtomicUsize::new(0),
            }),
            tasks: TaskGroup::new(),
        })
    }

    /// Spawn one task per racer; the count must match the one given to `new`
    pub fn start(&self, racers: Vec<Racer>) -> Result<(), StartError> {
        let expected = self.track.state.participants();
        if racers.len() != expected {
            return Err(ConfigError::ParticipantCount {
                expected,
                actual: racers.len(),
            }
            .into());
        }
        self.track.lifecycle.begin()?;
        *self.track.names.lock().unwrap_or_else(|e| e.into_inner()) =
            racers.iter().map(|r| r.name().to_string()).collect();
        self.track.active.store(racers.len(), Ordering::SeqCst);
        tracing::info!(
            goal = self.track.state.goal(),
            participants = expected,
            fairness = %self.track.gate.fairness(),
            "mutex race started"
        );

        for (index, racer) in racers.into_iter().enumerate() {
            let name = format!("racer-{}", racer.name());
            self.tasks
                .spawn(name, run_participant(self.track.clone(), index, racer));
        }
        Ok(())
    }

    pub fn stop(&self) -> bool {
        self.track.lifecycle.stop()
    }

    pub fn is_running(&self) -> bool {
        self.track.lifecycle.is_running()
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        self.track.lifecycle.phase()
    }

    pub async fn join(&self) {
        self.tasks.join().await;
    }

    pub async fn reset_race(&self) -> Result<(), LifecycleError> {
        if self.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }
        self.tasks.join().await;
        self.track.state.reset();
        self.track.gate.drain();
        self.track.gate.release();
        self.track.lifecycle.rearm();
        tracing::debug!("mutex race reset");
        Ok(())
    }

    pub fn winner_name(&self) -> Option<String> {
        self.track.state.winner_name()
    }

    pub fn is_winner_declared(&self) -> bool {
        self.track.state.is_winner_declared()
    }

    /// Distance covered by the racer at `index`, in start order
    pub fn distance(&self, index: usize) -> Option<u64> {
        self.track.state.distance(index)
    }

    pub fn open_permits(&self) -> usize {
        self.track.gate.available_permits()
    }

    pub fn fairness(&self) -> Fairness {
        self.track.gate.fairness()
    }

    pub fn state(&self) -> &RaceState {
        &self.track.state
    }

    pub fn summary(&self) -> RaceSummary {
        let names = self
            .track
            .names
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        self.track.state.summary(&names)
    }
}

impl Drop for SimpleMutexCoordinator {
    fn drop(&mut self) {
        self.track.lifecycle.stop();
    }
}

async fn run_participant(track: Arc<Track>, index: usize, mut racer: Racer) {
    let _seat = Seat::take(&track.lifecycle, &track.active);
    let stop = track.lifecycle.signal();

    while !track.state.is_winner_declared() && !track.state.has_reached_goal(index) {
        let Ok(permit) = track.gate.enter(&stop).await else {
            break;
        };
        if track.state.is_winner_declared() || stop.is_stopped() {
            break;
        }
        take_turn(&track.state, index, &mut racer, track.observer.as_ref());
        drop(permit);

        if stop.sleep(racer.next_pause()).await.is_err() {
            break;
        }
    }

    tracing::trace!(racer = %racer.name(), "participant exited");
}

#[cfg(test)]
#[path = "mutex_tests.rs"]
mod tests;
