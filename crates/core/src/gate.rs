// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate: the permit primitive every coordinator is built from
//!
//! A gate holds a permit count and a queue of waiting tasks. `acquire` blocks
//! until a permit is free and consumes it; `release` adds one back. Binary gates
//! cap the count at one, counting gates do not.
//!
//! Waiters are tracked by ticket. Under [`Fairness::Fifo`] only the oldest
//! ticket may take a permit; under [`Fairness::Unordered`] any waiter may,
//! including one that has not queued yet.

use crate::lifecycle::{Cancelled, StopSignal};
use std::collections::BTreeSet;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Order in which blocked waiters are granted permits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fairness {
    /// Grants follow arrival order
    Fifo,
    /// Any waiter may be granted next
    #[default]
    Unordered,
}

impl std::fmt::Display for Fairness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fairness::Fifo => write!(f, "fifo"),
            Fairness::Unordered => write!(f, "unordered"),
        }
    }
}

#[derive(Debug)]
struct GateState {
    permits: usize,
    waiters: BTreeSet<u64>,
    next_ticket: u64,
}

#[derive(Debug)]
pub struct Gate {
    name: String,
    fairness: Fairness,
    /// `Some(1)` for binary gates
    capacity: Option<usize>,
    state: Mutex<GateState>,
    notify: Notify,
}

impl Gate {
    /// A gate holding at most one permit
    pub fn binary(name: impl Into<String>, fairness: Fairness, open: bool) -> Self {
        Self::with_capacity(name.into(), fairness, Some(1), usize::from(open))
    }

    /// A semaphore-style gate starting with `permits`
    pub fn counting(name: impl Into<String>, fairness: Fairness, permits: usize) -> Self {
        Self::with_capacity(name.into(), fairness, None, permits)
    }

    fn with_capacity(
        name: String,
        fairness: Fairness,
        capacity: Option<usize>,
        permits: usize,
    ) -> Self {
        Self {
            name,
            fairness,
            capacity,
            state: Mutex::new(GateState {
                permits,
                waiters: BTreeSet::new(),
                next_ticket: 0,
            }),
            notify: Notify::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fairness(&self) -> Fairness {
        self.fairness
    }

    pub fn available_permits(&self) -> usize {
        self.lock().permits
    }

    /// Number of tasks currently blocked in `acquire`
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Take a permit if one is free and no queued waiter has priority
    pub fn try_acquire(&self) -> bool {
        let mut state = self.lock();
        let eligible = match self.fairness {
            Fairness::Fifo => state.waiters.is_empty(),
            Fairness::Unordered => true,
        };
        if state.permits > 0 && eligible {
            state.permits -= 1;
            tracing::trace!(gate = %self.name, remaining = state.permits, "permit taken");
            true
        } else {
            false
        }
    }

    /// Block until a permit is granted or `stop` fires.
    ///
    /// A cancelled call consumes nothing.
    pub async fn acquire(&self, stop: &StopSignal) -> Result<(), Cancelled> {
        let mut waiter = Waiter::enqueue(self);
        loop {
            // Register before checking so a release in between is not missed
            let notified = self.notify.notified();
            if waiter.try_take() {
                return Ok(());
            }
            tokio::select! {
                _ = notified => {}
                _ = stop.cancelled() => {
                    tracing::trace!(gate = %self.name, "acquire cancelled");
                    return Err(Cancelled);
                }
            }
        }
    }

    /// Acquire a permit that is handed back when the returned guard drops
    pub async fn enter(&self, stop: &StopSignal) -> Result<GatePermit<'_>, Cancelled> {
        self.acquire(stop).await?;
        Ok(GatePermit { gate: self })
    }

    /// Add a permit and wake waiters.
    ///
    /// On a binary gate that already holds its permit this is a no-op and
    /// returns false.
    pub fn release(&self) -> bool {
        let mut state = self.lock();
        if self.capacity.is_some_and(|cap| state.permits >= cap) {
            tracing::trace!(gate = %self.name, "release ignored, gate already open");
            return false;
        }
        state.permits += 1;
        debug_assert!(!self.capacity.is_some_and(|cap| state.permits > cap));
        let has_waiters = !state.waiters.is_empty();
        tracing::trace!(gate = %self.name, permits = state.permits, "permit released");
        drop(state);
        if has_waiters {
            self.notify.notify_waiters();
        }
        true
    }

    /// Release this gate when the returned guard drops.
    ///
    /// Taken right after entering a critical section whose exit opens some
    /// other gate, so the turn moves on even if the section unwinds.
    pub fn handoff(&self) -> Handoff<'_> {
        Handoff { gate: self }
    }

    /// Zero the permit count without waking anyone. Returns the permits removed.
    pub fn drain(&self) -> usize {
        let mut state = self.lock();
        std::mem::take(&mut state.permits)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A queued acquire; leaves the queue on grant or on drop
struct Waiter<'a> {
    gate: &'a Gate,
    ticket: u64,
    granted: bool,
}

impl<'a> Waiter<'a> {
    fn enqueue(gate: &'a Gate) -> Self {
        let mut state = gate.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.waiters.insert(ticket);
        Self {
            gate,
            ticket,
            granted: false,
        }
    }

    fn try_take(&mut self) -> bool {
        let mut state = self.gate.lock();
        let eligible = match self.gate.fairness {
            Fairness::Fifo => state.waiters.first() == Some(&self.ticket),
            Fairness::Unordered => true,
        };
        if state.permits == 0 || !eligible {
            return false;
        }
        state.permits -= 1;
        debug_assert!(!self.gate.capacity.is_some_and(|cap| state.permits >= cap));
        state.waiters.remove(&self.ticket);
        self.granted = true;
        tracing::trace!(gate = %self.gate.name, ticket = self.ticket, remaining = state.permits, "permit granted");
        let pass_on = state.permits > 0 && !state.waiters.is_empty();
        drop(state);
        if pass_on {
            self.gate.notify.notify_waiters();
        }
        true
    }
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        if self.granted {
            return;
        }
        let mut state = self.gate.lock();
        state.waiters.remove(&self.ticket);
        // The head of a FIFO queue may have changed; let the new head look
        let pass_on = state.permits > 0 && !state.waiters.is_empty();
        drop(state);
        if pass_on {
            self.gate.notify.notify_waiters();
        }
    }
}

/// A held permit, released on drop
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a Gate,
}

impl GatePermit<'_> {
    pub fn gate(&self) -> &Gate {
        self.gate
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

/// A release owed to a gate, paid on drop
#[derive(Debug)]
#[must_use = "dropping a handoff releases its gate immediately"]
pub struct Handoff<'a> {
    gate: &'a Gate,
}

impl Drop for Handoff<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
