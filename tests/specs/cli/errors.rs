//! Error reporting specs
//!
//! Invalid parameters are rejected before any task starts.

use crate::prelude::*;

#[test]
fn missing_config_file_names_the_path() {
    let temp = Project::empty();

    temp.baton()
        .args(&["--config", "nope.toml", "light", "--rotations", "1"])
        .fails()
        .stderr_has("nope.toml");
}

#[test]
fn zero_goal_is_rejected() {
    let temp = Project::empty();

    temp.baton()
        .args(&["race", "--goal", "0"])
        .fails()
        .stderr_has("goal must be at least 1");
}

#[test]
fn alternating_race_needs_two_runners() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&["race", "--runners", "a", "b", "c", "--pause", "0s"])
        .fails()
        .stderr_has("expected 2 participants, got 3");
    assert!(run.stdout().is_empty());
}

#[test]
fn inverted_step_range_is_rejected() {
    let temp = Project::empty();

    temp.baton()
        .args(&["race", "--step-min", "9", "--step-max", "2"])
        .fails()
        .stderr_has("invalid range");
}

#[test]
fn zero_stations_are_rejected() {
    let temp = Project::empty();

    temp.baton()
        .args(&["lab", "--stations", "0"])
        .fails()
        .stderr_has("at least one workstation");
}

#[test]
fn zero_rotations_are_rejected() {
    let temp = Project::empty();

    temp.baton()
        .args(&["light", "--rotations", "0"])
        .fails()
        .stderr_has("rotation limit");
}
