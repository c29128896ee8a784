// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Demo configuration and construction-time validation
//!
//! Every coordinator validates its parameters when it is built; nothing here
//! can fail once a run has started.

use crate::gate::Fairness;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a ring needs at least one phase")]
    EmptyRing,
    #[error("rotation limit must be at least 1")]
    ZeroRotations,
    #[error("race goal must be at least 1")]
    ZeroGoal,
    #[error("a race needs at least one participant")]
    NoParticipants,
    #[error("expected {expected} participants, got {actual}")]
    ParticipantCount { expected: usize, actual: usize },
    #[error("a lab needs at least one workstation")]
    ZeroStations,
    #[error("invalid range: {lo} is greater than {hi}")]
    InvalidRange { lo: i64, hi: i64 },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which race coordinator a demo runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceMode {
    /// Two racers strictly taking turns
    #[default]
    Alternating,
    /// Any number of racers sharing one gate, no turn order
    Mutex,
}

impl std::fmt::Display for RaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaceMode::Alternating => write!(f, "alternating"),
            RaceMode::Mutex => write!(f, "mutex"),
        }
    }
}

/// How the traffic light is synchronized
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightVariant {
    /// One gate per color, handed on in rotation
    #[default]
    Ring,
    /// One runner behind a single gate
    Single,
}

impl std::fmt::Display for LightVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightVariant::Ring => write!(f, "ring"),
            LightVariant::Single => write!(f, "single"),
        }
    }
}

/// Top-level configuration file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatonConfig {
    pub light: LightConfig,
    pub race: RaceConfig,
    pub lab: LabConfig,
}

impl BatonConfig {
    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BatonConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.light.validate()?;
        self.race.validate()?;
        self.lab.validate()
    }
}

/// Traffic light ring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightConfig {
    pub variant: LightVariant,
    #[serde(with = "humantime_serde")]
    pub red: Duration,
    #[serde(with = "humantime_serde")]
    pub green: Duration,
    #[serde(with = "humantime_serde")]
    pub amber: Duration,
    /// How long the demo runs before it is stopped
    #[serde(with = "humantime_serde")]
    pub run_for: Duration,
    /// Stop by itself after this many full rotations instead
    pub rotations: Option<u64>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            variant: LightVariant::Ring,
            red: Duration::from_secs(3),
            green: Duration::from_secs(3),
            amber: Duration::from_secs(1),
            run_for: Duration::from_secs(20),
            rotations: None,
        }
    }
}

impl LightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotations == Some(0) {
            return Err(ConfigError::ZeroRotations);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RaceConfig {
    pub mode: RaceMode,
    pub goal: u64,
    pub step_min: i64,
    pub step_max: i64,
    #[serde(with = "humantime_serde")]
    pub pause_min: Duration,
    #[serde(with = "humantime_serde")]
    pub pause_max: Duration,
    pub runners: Vec<String>,
    /// Gate fairness for the mutex race
    pub fairness: Fairness,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            mode: RaceMode::Alternating,
            goal: 100,
            step_min: 1,
            step_max: 10,
            pause_min: Duration::from_millis(200),
            pause_max: Duration::from_millis(400),
            runners: vec!["Goku".to_string(), "Vegeta".to_string()],
            fairness: Fairness::Unordered,
        }
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal == 0 {
            return Err(ConfigError::ZeroGoal);
        }
        if self.runners.is_empty() {
            return Err(ConfigError::NoParticipants);
        }
        if self.mode == RaceMode::Alternating && self.runners.len() != 2 {
            return Err(ConfigError::ParticipantCount {
                expected: 2,
                actual: self.runners.len(),
            });
        }
        check_range(self.step_min, self.step_max)?;
        check_duration_range(self.pause_min, self.pause_max)
    }
}

/// Shared workstation lab
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub stations: usize,
    pub students: usize,
    #[serde(with = "humantime_serde")]
    pub usage_min: Duration,
    #[serde(with = "humantime_serde")]
    pub usage_max: Duration,
    /// Report which station each student used
    pub numbered: bool,
    pub fairness: Fairness,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            stations: 4,
            students: 6,
            usage_min: Duration::from_secs(3),
            usage_max: Duration::from_secs(5),
            numbered: false,
            fairness: Fairness::Fifo,
        }
    }
}

impl LabConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stations == 0 {
            return Err(ConfigError::ZeroStations);
        }
        check_duration_range(self.usage_min, self.usage_max)
    }
}

fn check_range(lo: i64, hi: i64) -> Result<(), ConfigError> {
    if lo > hi {
        return Err(ConfigError::InvalidRange { lo, hi });
    }
    Ok(())
}

fn check_duration_range(lo: Duration, hi: Duration) -> Result<(), ConfigError> {
    let millis = |d: Duration| i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
    check_range(millis(lo), millis(hi))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
