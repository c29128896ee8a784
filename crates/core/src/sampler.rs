// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step-size and delay generators
//!
//! Samplers return raw values; the consumer applies its own clamp (steps are
//! at least 1, pauses at least 0 ms).

use crate::config::ConfigError;
use rand::Rng;
use std::time::Duration;

pub trait Sampler: Send + 'static {
    fn sample(&mut self) -> i64;
}

impl<F> Sampler for F
where
    F: FnMut() -> i64 + Send + 'static,
{
    fn sample(&mut self) -> i64 {
        self()
    }
}

/// Always yields the same value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixed(pub i64);

impl Sampler for Fixed {
    fn sample(&mut self) -> i64 {
        self.0
    }
}

/// Uniform over an inclusive range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Uniform {
    lo: i64,
    hi: i64,
}

impl Uniform {
    pub fn new(lo: i64, hi: i64) -> Result<Self, ConfigError> {
        if lo > hi {
            return Err(ConfigError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Uniform over whole milliseconds between two durations
    pub fn millis(lo: Duration, hi: Duration) -> Result<Self, ConfigError> {
        Self::new(duration_millis(lo), duration_millis(hi))
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.lo, self.hi)
    }
}

impl Sampler for Uniform {
    fn sample(&mut self) -> i64 {
        rand::thread_rng().gen_range(self.lo..=self.hi)
    }
}

/// Race step: 1 to 10 meters
pub fn default_steps() -> Uniform {
    Uniform { lo: 1, hi: 10 }
}

/// Race pause: 200 to 400 ms
pub fn default_pauses() -> Uniform {
    Uniform { lo: 200, hi: 400 }
}

/// Lab usage: 3 to 5 s
pub fn default_usage() -> Uniform {
    Uniform { lo: 3_000, hi: 5_000 }
}

/// Clamp a sampled step up to the minimum of one unit
pub fn clamp_step(raw: i64) -> u64 {
    raw.max(1).unsigned_abs()
}

/// Clamp a sampled delay (in ms) up to zero
pub fn clamp_pause(raw_millis: i64) -> Duration {
    Duration::from_millis(raw_millis.max(0).unsigned_abs())
}

fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
