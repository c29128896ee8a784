// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-participant race in strict alternation
//!
//! Each side owns a binary gate. A side waits on its own gate, takes one
//! turn, then opens the other side's gate. Exactly one gate is open (or its
//! permit held) at any moment until a winner is declared.

use super::racer::{take_turn, Racer, Seat};
use super::state::{RaceState, RaceSummary};
use crate::config::ConfigError;
use crate::gate::{Fairness, Gate};
use crate::lifecycle::{Lifecycle, LifecycleError, LifecyclePhase, TaskGroup};
use crate::observer::ProgressObserver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One of the two seats in an alternating pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

struct Pair {
    gates: [Gate; 2],
    state: RaceState,
    lifecycle: Lifecycle,
    observer: Box<dyn ProgressObserver>,
    starter: Side,
    names: Mutex<[String; 2]>,
    active: AtomicUsize,
}

impl Pair {
    fn gate(&self, side: Side) -> &Gate {
        &self.gates[side.index()]
    }

    /// Close both gates and hand the first turn to the starter
    fn arm_gates(&self) {
        for gate in &self.gates {
            gate.drain();
        }
        self.gate(self.starter).release();
    }

    fn names(&self) -> [String; 2] {
        self.names.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

pub struct AlternatingPairCoordinator {
    pair: Arc<Pair>,
    tasks: TaskGroup,
}

impl AlternatingPairCoordinator {
    pub fn new(
        goal: u64,
        starter: Side,
        observer: impl ProgressObserver,
    ) -> Result<Self, ConfigError> {
        let pair = Pair {
            gates: [
                Gate::binary("first", Fairness::Fifo, false),
                Gate::binary("second", Fairness::Fifo, false),
            ],
            state: RaceState::new(goal, 2)?,
            lifecycle: Lifecycle::new(),
            observer: Box::new(observer),
            starter,
            names: Mutex::new([String::new(), String::new()]),
            active: AtomicUsize::new(0),
        };
        pair.arm_gates();
        Ok(Self {
            pair: Arc::new(pair),
            tasks: TaskGroup::new(),
        })
    }

    /// Spawn both participants; `racers[0]` sits on [`Side::First`]
    pub fn start(&self, racers: [Racer; 2]) -> Result<(), LifecycleError> {
        self.pair.lifecycle.begin()?;
        *self.pair.names.lock().unwrap_or_else(|e| e.into_inner()) =
            [racers[0].name().to_string(), racers[1].name().to_string()];
        self.pair.active.store(2, Ordering::SeqCst);
        tracing::info!(
            goal = self.pair.state.goal(),
            first = %racers[0].name(),
            second = %racers[1].name(),
            "alternating race started"
        );

        for (side, racer) in [Side::First, Side::Second].into_iter().zip(racers) {
            let name = format!("racer-{}", racer.name());
            self.tasks
                .spawn(name, run_participant(self.pair.clone(), side, racer));
        }
        Ok(())
    }

    /// Idempotent; wakes a participant blocked on its gate or in its pause
    pub fn stop(&self) -> bool {
        self.pair.lifecycle.stop()
    }

    pub fn is_running(&self) -> bool {
        self.pair.lifecycle.is_running()
    }

    pub fn lifecycle_phase(&self) -> LifecyclePhase {
        self.pair.lifecycle.phase()
    }

    pub async fn join(&self) {
        self.tasks.join().await;
    }

    /// Clear distances and the winner, and give the starter the first turn again
    pub async fn reset_race(&self) -> Result<(), LifecycleError> {
        if self.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }
        self.tasks.join().await;
        self.pair.state.reset();
        self.pair.arm_gates();
        self.pair.lifecycle.rearm();
        tracing::debug!("alternating race reset");
        Ok(())
    }

    pub fn winner_name(&self) -> Option<String> {
        self.pair.state.winner_name()
    }

    pub fn is_winner_declared(&self) -> bool {
        self.pair.state.is_winner_declared()
    }

    pub fn distance(&self, side: Side) -> u64 {
        self.pair.state.distance(side.index()).unwrap_or_default()
    }

    pub fn open_permits(&self) -> usize {
        self.pair.gates.iter().map(Gate::available_permits).sum()
    }

    pub fn state(&self) -> &RaceState {
        &self.pair.state
    }

    pub fn summary(&self) -> RaceSummary {
        self.pair.state.summary(&self.pair.names())
    }
}

impl Drop for AlternatingPairCoordinator {
    fn drop(&mut self) {
        self.pair.lifecycle.stop();
    }
}

async fn run_participant(pair: Arc<Pair>, side: Side, mut racer: Racer) {
    let _seat = Seat::take(&pair.lifecycle, &pair.active);
    let stop = pair.lifecycle.signal();
    let index = side.index();
    let mine = pair.gate(side);
    let theirs = pair.gate(side.other());

    while !pair.state.is_winner_declared() && !pair.state.has_reached_goal(index) {
        if mine.acquire(&stop).await.is_err() {
            theirs.release();
            break;
        }
        // Dropping the handoff passes the turn on, on every path out of here
        let turn = theirs.handoff();
        if pair.state.is_winner_declared() || stop.is_stopped() {
            break;
        }

        take_turn(&pair.state, index, &mut racer, pair.observer.as_ref());
        drop(turn);

        if stop.sleep(racer.next_pause()).await.is_err() {
            break;
        }
    }

    tracing::trace!(racer = %racer.name(), "participant exited");
}

#[cfg(test)]
#[path = "alternating_tests.rs"]
mod tests;
