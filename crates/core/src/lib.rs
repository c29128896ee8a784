// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! baton-core: gate-based coordination of cooperating tasks
//!
//! This crate provides:
//! - [`Gate`], a binary or counting permit primitive with optional FIFO fairness
//! - A token-ring [`CycleCoordinator`] for repeating phase machines
//! - Two race coordinators sharing a single-winner [`RaceState`]
//! - A counting-gate [`Workstations`] lab
//! - TOML configuration for all of the above

pub mod config;
pub mod cycle;
pub mod gate;
pub mod lab;
pub mod lifecycle;
pub mod observer;
pub mod race;
pub mod sampler;

pub use config::{
    BatonConfig, ConfigError, LabConfig, LightConfig, LightVariant, RaceConfig, RaceMode,
};
pub use cycle::{CycleCoordinator, LightColor, Phase, SingleGateCycle};
pub use gate::{Fairness, Gate, GatePermit, Handoff};
pub use lab::{LabSummary, NumberedReport, PlainReport, Student, UsageReport, Workstations};
pub use lifecycle::{Cancelled, Lifecycle, LifecycleError, LifecyclePhase, StopSignal, TaskGroup};
pub use observer::{PhaseObserver, ProgressObserver, RecordingObserver, TracingObserver};
pub use race::{
    AlternatingPairCoordinator, RaceState, RaceSummary, Racer, Side, SimpleMutexCoordinator,
    Standing, StartError,
};
pub use sampler::{Fixed, Sampler, Uniform};
