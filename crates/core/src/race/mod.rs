// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Races to a shared goal distance
//!
//! - [`AlternatingPairCoordinator`] - two participants in strict alternation
//! - [`SimpleMutexCoordinator`] - any number of participants behind one gate
//!
//! Both share [`RaceState`] and its single-winner rule.

pub mod alternating;
pub mod mutex;
pub mod racer;
pub mod state;

pub use alternating::{AlternatingPairCoordinator, Side};
pub use mutex::{SimpleMutexCoordinator, StartError};
pub use racer::Racer;
pub use state::{RaceState, RaceSummary, Standing};
