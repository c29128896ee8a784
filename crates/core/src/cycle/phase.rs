// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Labeled, timed steps of a repeating state machine

use std::time::Duration;

/// One step of the ring: shown while its gate is held, then held for `duration`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phase {
    label: String,
    duration: Duration,
}

impl Phase {
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }

    /// Negative durations clamp to zero
    pub fn from_millis(label: impl Into<String>, millis: i64) -> Self {
        Self::new(label, Duration::from_millis(millis.max(0).unsigned_abs()))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Colors of a traffic light, in rotation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightColor {
    Red,
    Green,
    Amber,
}

impl LightColor {
    pub const ROTATION: [LightColor; 3] = [LightColor::Red, LightColor::Green, LightColor::Amber];

    pub fn label(self) -> &'static str {
        match self {
            LightColor::Red => "RED",
            LightColor::Green => "GREEN",
            LightColor::Amber => "AMBER",
        }
    }

    pub fn default_duration(self) -> Duration {
        match self {
            LightColor::Red | LightColor::Green => Duration::from_secs(3),
            LightColor::Amber => Duration::from_secs(1),
        }
    }

    /// The color following this one
    pub fn next(self) -> LightColor {
        match self {
            LightColor::Red => LightColor::Green,
            LightColor::Green => LightColor::Amber,
            LightColor::Amber => LightColor::Red,
        }
    }

    pub fn from_label(label: &str) -> Option<LightColor> {
        Self::ROTATION
            .into_iter()
            .find(|color| color.label().eq_ignore_ascii_case(label))
    }

    /// RED -> GREEN -> AMBER ring with the given durations
    pub fn phases(red: Duration, green: Duration, amber: Duration) -> Vec<Phase> {
        vec![
            Phase::new(LightColor::Red.label(), red),
            Phase::new(LightColor::Green.label(), green),
            Phase::new(LightColor::Amber.label(), amber),
        ]
    }

    /// The ring with every color at its default duration
    pub fn default_phases() -> Vec<Phase> {
        Self::ROTATION
            .into_iter()
            .map(|color| Phase::new(color.label(), color.default_duration()))
            .collect()
    }
}

impl std::fmt::Display for LightColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
