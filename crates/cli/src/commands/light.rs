// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `baton light` - traffic light ring

use super::interrupted;
use anyhow::Result;
use baton_core::{
    CycleCoordinator, LifecycleError, LightColor, LightConfig, LightVariant, SingleGateCycle,
};
use clap::ValueEnum;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// One gate per color, handed on in rotation
    Ring,
    /// One runner behind a single gate
    Single,
}

impl From<VariantArg> for LightVariant {
    fn from(variant: VariantArg) -> Self {
        match variant {
            VariantArg::Ring => LightVariant::Ring,
            VariantArg::Single => LightVariant::Single,
        }
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct LightArgs {
    /// How the colors are synchronized
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Time spent on red
    #[arg(long, value_parser = humantime::parse_duration)]
    red: Option<Duration>,

    /// Time spent on green
    #[arg(long, value_parser = humantime::parse_duration)]
    green: Option<Duration>,

    /// Time spent on amber
    #[arg(long, value_parser = humantime::parse_duration)]
    amber: Option<Duration>,

    /// Stop the light after this long
    #[arg(long, value_parser = humantime::parse_duration, conflicts_with = "rotations")]
    run_for: Option<Duration>,

    /// Stop after this many full RED, GREEN, AMBER rotations
    #[arg(long)]
    rotations: Option<u64>,
}

impl LightArgs {
    /// Flags override file values
    pub fn apply(self, config: &mut LightConfig) {
        if let Some(variant) = self.variant {
            config.variant = variant.into();
        }
        if let Some(red) = self.red {
            config.red = red;
        }
        if let Some(green) = self.green {
            config.green = green;
        }
        if let Some(amber) = self.amber {
            config.amber = amber;
        }
        if let Some(run_for) = self.run_for {
            config.run_for = run_for;
            config.rotations = None;
        }
        if let Some(rotations) = self.rotations {
            config.rotations = Some(rotations);
        }
    }
}

/// Either light, behind the few calls the command needs
enum Light {
    Ring(CycleCoordinator),
    Single(SingleGateCycle),
}

impl Light {
    fn build(config: &LightConfig) -> Result<Self> {
        let phases = LightColor::phases(config.red, config.green, config.amber);
        let print = |label: &str| println!("Color: {}", label);
        let light = match (config.variant, config.rotations) {
            (LightVariant::Ring, None) => Light::Ring(CycleCoordinator::new(phases, print)?),
            (LightVariant::Ring, Some(rotations)) => Light::Ring(
                CycleCoordinator::new(phases, print)?.with_rotation_limit(rotations)?,
            ),
            (LightVariant::Single, None) => Light::Single(SingleGateCycle::new(phases, print)?),
            (LightVariant::Single, Some(rotations)) => Light::Single(
                SingleGateCycle::new(phases, print)?.with_rotation_limit(rotations)?,
            ),
        };
        Ok(light)
    }

    fn start(&self) -> Result<(), LifecycleError> {
        match self {
            Light::Ring(ring) => ring.start(),
            Light::Single(single) => single.start(),
        }
    }

    fn stop(&self) {
        match self {
            Light::Ring(ring) => ring.stop(),
            Light::Single(single) => single.stop(),
        };
    }

    async fn join(&self) {
        match self {
            Light::Ring(ring) => ring.join().await,
            Light::Single(single) => single.join().await,
        }
    }
}

pub async fn handle(args: LightArgs, mut config: LightConfig) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let light = Light::build(&config)?;
    let deadline = match config.rotations {
        Some(_) => None,
        None => Some(config.run_for),
    };

    tracing::debug!(variant = %config.variant, "building light");
    light.start()?;
    tokio::select! {
        _ = light.join() => return Ok(()),
        _ = sleep_until_deadline(deadline) => tracing::info!("run time elapsed"),
        _ = interrupted() => {}
    }

    light.stop();
    light.join().await;
    Ok(())
}

async fn sleep_until_deadline(deadline: Option<Duration>) {
    match deadline {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
