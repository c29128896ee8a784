// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared race state: distances, turn count and the write-once winner
//!
//! Distances and the turn count are only changed by the participant holding
//! the coordinator's gate. The winner flag is the exception: it flips through
//! a single compare-and-set, and only the caller that wins the flip records
//! its name.

use crate::config::ConfigError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
pub struct RaceState {
    goal: u64,
    distances: Vec<AtomicU64>,
    turns: AtomicU64,
    winner_declared: AtomicBool,
    winner: Mutex<Option<String>>,
}

impl RaceState {
    pub fn new(goal: u64, participants: usize) -> Result<Self, ConfigError> {
        if goal == 0 {
            return Err(ConfigError::ZeroGoal);
        }
        if participants == 0 {
            return Err(ConfigError::NoParticipants);
        }
        Ok(Self {
            goal,
            distances: (0..participants).map(|_| AtomicU64::new(0)).collect(),
            turns: AtomicU64::new(0),
            winner_declared: AtomicBool::new(false),
            winner: Mutex::new(None),
        })
    }

    pub fn goal(&self) -> u64 {
        self.goal
    }

    pub fn participants(&self) -> usize {
        self.distances.len()
    }

    /// Add `step` to a participant's distance; returns the new total.
    ///
    /// Callers pass an index below [`participants`](Self::participants).
    pub(crate) fn advance(&self, index: usize, step: u64) -> u64 {
        self.distances[index].fetch_add(step, Ordering::AcqRel) + step
    }

    /// `None` for an index past the last participant
    pub fn distance(&self, index: usize) -> Option<u64> {
        self.distances.get(index).map(|d| d.load(Ordering::Acquire))
    }

    pub fn distances(&self) -> Vec<u64> {
        self.distances
            .iter()
            .map(|d| d.load(Ordering::Acquire))
            .collect()
    }

    pub fn has_reached_goal(&self, index: usize) -> bool {
        self.distance(index).is_some_and(|d| d >= self.goal)
    }

    /// Participants at or past the goal
    pub fn leader_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|d| d.load(Ordering::Acquire) >= self.goal)
            .count()
    }

    /// Count one critical-section entry
    pub fn record_turn(&self) -> u64 {
        self.turns.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn turns(&self) -> u64 {
        self.turns.load(Ordering::Acquire)
    }

    /// Flip the winner flag false -> true. Exactly one caller per race gets `true`.
    pub fn try_declare_winner(&self, name: &str) -> bool {
        if self
            .winner_declared
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        *self.winner.lock().unwrap_or_else(|e| e.into_inner()) = Some(name.to_string());
        tracing::info!(winner = %name, "winner declared");
        true
    }

    pub fn is_winner_declared(&self) -> bool {
        self.winner_declared.load(Ordering::Acquire)
    }

    pub fn winner_name(&self) -> Option<String> {
        self.winner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Clear the winner, distances and turn count ahead of a new run
    pub fn reset(&self) {
        *self.winner.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.winner_declared.store(false, Ordering::Release);
        for distance in &self.distances {
            distance.store(0, Ordering::Release);
        }
        self.turns.store(0, Ordering::Release);
    }

    /// Snapshot for reporting, labelled with participant names
    pub fn summary(&self, names: &[String]) -> RaceSummary {
        RaceSummary {
            goal: self.goal,
            winner: self.winner_name(),
            turns: self.turns(),
            standings: names
                .iter()
                .zip(self.distances())
                .map(|(name, distance)| Standing {
                    name: name.clone(),
                    distance,
                })
                .collect(),
        }
    }
}

/// Outcome of a race, read after its participants have terminated
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RaceSummary {
    pub goal: u64,
    pub winner: Option<String>,
    pub turns: u64,
    pub standings: Vec<Standing>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub name: String,
    pub distance: u64,
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
