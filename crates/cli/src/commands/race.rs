// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `baton race` - runners racing to a goal

use super::{interrupted, millis};
use anyhow::Result;
use baton_core::{
    AlternatingPairCoordinator, Fairness, Fixed, RaceConfig, RaceMode, RaceSummary, Racer, Side,
    SimpleMutexCoordinator, Uniform,
};
use clap::ValueEnum;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Two runners strictly taking turns
    Alternating,
    /// Any number of runners sharing one gate
    Mutex,
}

impl From<ModeArg> for RaceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Alternating => RaceMode::Alternating,
            ModeArg::Mutex => RaceMode::Mutex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FairnessArg {
    Fifo,
    Unordered,
}

impl From<FairnessArg> for Fairness {
    fn from(fairness: FairnessArg) -> Self {
        match fairness {
            FairnessArg::Fifo => Fairness::Fifo,
            FairnessArg::Unordered => Fairness::Unordered,
        }
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct RaceArgs {
    /// Race coordinator to use
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Distance to reach
    #[arg(long)]
    goal: Option<u64>,

    /// Fixed step per turn
    #[arg(long, conflicts_with_all = ["step_min", "step_max"])]
    step: Option<i64>,

    /// Smallest random step
    #[arg(long)]
    step_min: Option<i64>,

    /// Largest random step
    #[arg(long)]
    step_max: Option<i64>,

    /// Fixed pause after each turn
    #[arg(long, value_parser = humantime::parse_duration)]
    pause: Option<Duration>,

    /// Gate fairness for the mutex race
    #[arg(long, value_enum)]
    fairness: Option<FairnessArg>,

    /// Runner names, in seat order
    #[arg(long, num_args = 1..)]
    runners: Vec<String>,

    /// Print the final standings as JSON instead of progress lines
    #[arg(long)]
    json: bool,
}

impl RaceArgs {
    /// Flags override file values; returns whether JSON output was asked for
    pub fn apply(self, config: &mut RaceConfig) -> bool {
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(goal) = self.goal {
            config.goal = goal;
        }
        if let Some(step) = self.step {
            config.step_min = step;
            config.step_max = step;
        }
        if let Some(step_min) = self.step_min {
            config.step_min = step_min;
        }
        if let Some(step_max) = self.step_max {
            config.step_max = step_max;
        }
        if let Some(pause) = self.pause {
            config.pause_min = pause;
            config.pause_max = pause;
        }
        if let Some(fairness) = self.fairness {
            config.fairness = fairness.into();
        }
        if !self.runners.is_empty() {
            config.runners = self.runners;
        }
        self.json
    }
}

/// One racer per configured name, sampling from the configured ranges
pub fn build_racers(config: &RaceConfig) -> Result<Vec<Racer>> {
    let steps = Uniform::new(config.step_min, config.step_max)?;
    let pauses = Uniform::millis(config.pause_min, config.pause_max)?;
    let racers = config
        .runners
        .iter()
        .map(|name| {
            let racer = Racer::new(name.clone());
            let racer = if config.step_min == config.step_max {
                racer.with_steps(Fixed(config.step_min))
            } else {
                racer.with_steps(steps)
            };
            if config.pause_min == config.pause_max {
                racer.with_pauses(Fixed(millis(config.pause_min)))
            } else {
                racer.with_pauses(pauses)
            }
        })
        .collect();
    Ok(racers)
}

pub async fn handle(args: RaceArgs, mut config: RaceConfig) -> Result<()> {
    let json = args.apply(&mut config);
    config.validate()?;
    let racers = build_racers(&config)?;

    let summary = match config.mode {
        RaceMode::Alternating => run_alternating(&config, racers, json).await?,
        RaceMode::Mutex => run_mutex(&config, racers, json).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn progress(json: bool) -> impl Fn(&str) + Send + Sync + 'static {
    move |message: &str| {
        if !json {
            println!("{}", message);
        }
    }
}

async fn run_alternating(
    config: &RaceConfig,
    racers: Vec<Racer>,
    json: bool,
) -> Result<RaceSummary> {
    let pair: [Racer; 2] = racers.try_into().map_err(|rest: Vec<Racer>| {
        anyhow::anyhow!("alternating race needs 2 runners, got {}", rest.len())
    })?;
    let coordinator = AlternatingPairCoordinator::new(config.goal, Side::First, progress(json))?;

    coordinator.start(pair)?;
    tokio::select! {
        _ = coordinator.join() => {}
        _ = interrupted() => {
            coordinator.stop();
            coordinator.join().await;
        }
    }
    Ok(coordinator.summary())
}

async fn run_mutex(config: &RaceConfig, racers: Vec<Racer>, json: bool) -> Result<RaceSummary> {
    let coordinator = SimpleMutexCoordinator::new(
        config.goal,
        racers.len(),
        config.fairness,
        progress(json),
    )?;

    coordinator.start(racers)?;
    tokio::select! {
        _ = coordinator.join() => {}
        _ = interrupted() => {
            coordinator.stop();
            coordinator.join().await;
        }
    }
    Ok(coordinator.summary())
}

#[cfg(test)]
#[path = "race_tests.rs"]
mod tests;
