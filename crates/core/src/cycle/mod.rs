// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token ring of gates driving a repeating state machine
//!
//! Releasing gate *i* opens gate *i+1 mod N*, so phases run in strict rotation
//! and exactly one phase holds the token at any instant.
//!
//! [`SingleGateCycle`] is the weaker form: one runner behind one gate.

pub mod coordinator;
pub mod phase;
pub mod single;

pub use coordinator::CycleCoordinator;
pub use phase::{LightColor, Phase};
pub use single::SingleGateCycle;
