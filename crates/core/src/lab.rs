// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Students sharing a fixed number of lab workstations
//!
//! A counting gate bounds how many students are inside at once. Each student
//! entering claims the lowest-numbered free station and gives it back on the
//! way out, so the station a student reports is never shared.

use crate::config::ConfigError;
use crate::gate::{Fairness, Gate};
use crate::lifecycle::{StopSignal, TaskGroup};
use crate::observer::ProgressObserver;
use crate::sampler::{clamp_pause, default_usage, Sampler};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Someone who wants a workstation for a while
pub struct Student {
    name: String,
    usage: Box<dyn Sampler>,
}

impl Student {
    /// Uses a station for 3 to 5 seconds
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usage: Box::new(default_usage()),
        }
    }

    /// Usage samples are in milliseconds
    pub fn with_usage(mut self, usage: impl Sampler) -> Self {
        self.usage = Box::new(usage);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn next_usage(&mut self) -> Duration {
        clamp_pause(self.usage.sample())
    }
}

impl std::fmt::Debug for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Student").field("name", &self.name).finish()
    }
}

/// Wording of the start and finish messages
pub trait UsageReport: Send + Sync + 'static {
    fn started(&self, student: &str, station: usize) -> String;
    fn finished(&self, student: &str, station: usize) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlainReport;

impl UsageReport for PlainReport {
    fn started(&self, student: &str, _station: usize) -> String {
        format!("The student {} has started using a workstation", student)
    }

    fn finished(&self, student: &str, _station: usize) -> String {
        format!("The student {} has finished with the workstation", student)
    }
}

/// Names the station in both messages
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberedReport;

impl UsageReport for NumberedReport {
    fn started(&self, student: &str, station: usize) -> String {
        format!(
            "The student {} has started using workstation {}",
            student, station
        )
    }

    fn finished(&self, student: &str, station: usize) -> String {
        format!(
            "The student {} has finished with workstation {}",
            student, station
        )
    }
}

/// Counts for one [`Workstations::run`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabSummary {
    pub completed: usize,
    pub cancelled: usize,
    pub peak_concurrent: usize,
}

#[derive(Debug, Default)]
struct Tally {
    completed: AtomicUsize,
    cancelled: AtomicUsize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl Tally {
    fn summary(&self) -> LabSummary {
        LabSummary {
            completed: self.completed.load(Ordering::SeqCst),
            cancelled: self.cancelled.load(Ordering::SeqCst),
            peak_concurrent: self.peak.load(Ordering::SeqCst),
        }
    }
}

struct Lab {
    gate: Gate,
    stations: usize,
    free: Mutex<BTreeSet<usize>>,
    observer: Box<dyn ProgressObserver>,
}

impl Lab {
    fn claim(&self) -> Option<usize> {
        self.free
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_first()
    }

    fn vacate(&self, station: usize) {
        self.free
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(station);
    }
}

pub struct Workstations {
    lab: Arc<Lab>,
}

impl Workstations {
    /// A lab with stations numbered `1..=stations`
    pub fn new(
        stations: usize,
        fairness: Fairness,
        observer: impl ProgressObserver,
    ) -> Result<Self, ConfigError> {
        if stations == 0 {
            return Err(ConfigError::ZeroStations);
        }
        Ok(Self {
            lab: Arc::new(Lab {
                gate: Gate::counting("workstations", fairness, stations),
                stations,
                free: Mutex::new((1..=stations).collect()),
                observer: Box::new(observer),
            }),
        })
    }

    pub fn stations(&self) -> usize {
        self.lab.stations
    }

    /// Stations nobody is using right now
    pub fn available(&self) -> usize {
        self.lab.gate.available_permits()
    }

    /// Run every student to completion, or until `stop` fires
    pub async fn run(
        &self,
        students: Vec<Student>,
        report: impl UsageReport,
        stop: StopSignal,
    ) -> LabSummary {
        let report: Arc<dyn UsageReport> = Arc::new(report);
        let tally = Arc::new(Tally::default());
        let tasks = TaskGroup::new();
        tracing::info!(
            stations = self.lab.stations,
            students = students.len(),
            "lab opened"
        );

        for student in students {
            let name = format!("student-{}", student.name());
            tasks.spawn(
                name,
                session(
                    self.lab.clone(),
                    tally.clone(),
                    report.clone(),
                    student,
                    stop.clone(),
                ),
            );
        }
        tasks.join().await;

        let summary = tally.summary();
        tracing::info!(
            completed = summary.completed,
            cancelled = summary.cancelled,
            peak = summary.peak_concurrent,
            "lab closed"
        );
        summary
    }
}

async fn session(
    lab: Arc<Lab>,
    tally: Arc<Tally>,
    report: Arc<dyn UsageReport>,
    mut student: Student,
    stop: StopSignal,
) {
    let Ok(permit) = lab.gate.enter(&stop).await else {
        tally.cancelled.fetch_add(1, Ordering::SeqCst);
        return;
    };
    let Some(station) = lab.claim() else {
        tracing::error!(student = %student.name(), "permit granted with no free station");
        return;
    };

    let now = tally.in_use.fetch_add(1, Ordering::SeqCst) + 1;
    tally.peak.fetch_max(now, Ordering::SeqCst);
    lab.observer.on_activity(true);
    lab.observer
        .on_progress(&report.started(student.name(), station));

    let usage = student.next_usage();
    tracing::debug!(student = %student.name(), station, ?usage, "station in use");
    match stop.sleep(usage).await {
        Ok(()) => {
            lab.observer
                .on_progress(&report.finished(student.name(), station));
            tally.completed.fetch_add(1, Ordering::SeqCst);
        }
        Err(_) => {
            tally.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    lab.observer.on_activity(false);
    tally.in_use.fetch_sub(1, Ordering::SeqCst);
    lab.vacate(station);
    drop(permit);
}

#[cfg(test)]
#[path = "lab_tests.rs"]
mod tests;
