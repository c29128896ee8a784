// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! baton - gate coordination demos

mod commands;

use anyhow::{Context, Result};
use baton_core::BatonConfig;
use clap::{Parser, Subcommand};
use commands::{lab, light, race};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "baton",
    version,
    about = "Baton - tasks taking turns through gates"
)]
struct Cli {
    /// TOML file with [light], [race] and [lab] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter for stderr (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cycle a traffic light through its colors
    Light(light::LightArgs),
    /// Race runners to a goal distance
    Race(race::RaceArgs),
    /// Share a few workstations among many students
    Lab(lab::LabArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => BatonConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BatonConfig::default(),
    };

    match cli.command {
        Commands::Light(args) => light::handle(args, config.light).await,
        Commands::Race(args) => race::handle(args, config.race).await,
        Commands::Lab(args) => lab::handle(args, config.lab).await,
    }
}

fn setup_logging(level: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // stdout carries demo output only
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
