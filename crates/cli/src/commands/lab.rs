// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `baton lab` - students sharing workstations

use super::{interrupted, millis};
use anyhow::Result;
use baton_core::{
    Fixed, LabConfig, Lifecycle, NumberedReport, PlainReport, Student, Uniform, Workstations,
};
use std::time::Duration;

#[derive(clap::Args, Debug, Default)]
pub struct LabArgs {
    /// Number of workstations
    #[arg(long)]
    stations: Option<usize>,

    /// Number of students
    #[arg(long)]
    students: Option<usize>,

    /// Fixed time each student spends at a station
    #[arg(long, value_parser = humantime::parse_duration)]
    usage: Option<Duration>,

    /// Name the station in every message
    #[arg(long)]
    numbered: bool,
}

impl LabArgs {
    pub fn apply(self, config: &mut LabConfig) {
        if let Some(stations) = self.stations {
            config.stations = stations;
        }
        if let Some(students) = self.students {
            config.students = students;
        }
        if let Some(usage) = self.usage {
            config.usage_min = usage;
            config.usage_max = usage;
        }
        config.numbered |= self.numbered;
    }
}

/// Students named `1..=count`
pub fn build_students(config: &LabConfig) -> Result<Vec<Student>> {
    let usage = Uniform::millis(config.usage_min, config.usage_max)?;
    let students = (1..=config.students)
        .map(|i| {
            let student = Student::new(i.to_string());
            if config.usage_min == config.usage_max {
                student.with_usage(Fixed(millis(config.usage_min)))
            } else {
                student.with_usage(usage)
            }
        })
        .collect();
    Ok(students)
}

pub async fn handle(args: LabArgs, mut config: LabConfig) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let lab = Workstations::new(config.stations, config.fairness, |message: &str| {
        println!("{}", message)
    })?;
    let students = build_students(&config)?;
    let lifecycle = Lifecycle::new();

    let run = async {
        if config.numbered {
            lab.run(students, NumberedReport, lifecycle.signal()).await
        } else {
            lab.run(students, PlainReport, lifecycle.signal()).await
        }
    };
    tokio::pin!(run);

    let summary = tokio::select! {
        summary = &mut run => summary,
        _ = interrupted() => {
            lifecycle.stop();
            run.await
        }
    };
    tracing::info!(
        completed = summary.completed,
        cancelled = summary.cancelled,
        "lab finished"
    );
    Ok(())
}

#[cfg(test)]
#[path = "lab_tests.rs"]
mod tests;
