//! Configuration file specs
//!
//! Values come from `--config` and are overridden by flags.

use crate::prelude::*;

const INSTANT_LIGHT: &str = r#"
[light]
red = "0s"
green = "0s"
amber = "0s"
rotations = 1
"#;

#[test]
fn light_settings_come_from_the_file() {
    let temp = Project::empty();
    temp.file("baton.toml", INSTANT_LIGHT);
    assert!(temp.path().join("baton.toml").is_file());

    temp.baton()
        .args(&["--config", "baton.toml", "light"])
        .passes()
        .stdout_eq("Color: RED\nColor: GREEN\nColor: AMBER\n");
}

#[test]
fn flags_override_the_file() {
    let temp = Project::empty();
    temp.file("baton.toml", INSTANT_LIGHT);

    let run = temp
        .baton()
        .args(&["--config", "baton.toml", "light", "--rotations", "2"])
        .passes();
    assert_eq!(run.stdout_lines().len(), 6);
}

#[test]
fn race_section_drives_a_mutex_race() {
    let temp = Project::empty();
    temp.file(
        "conf/race.toml",
        r#"
[race]
mode = "mutex"
goal = 4
step_min = 2
step_max = 2
pause_min = "0s"
pause_max = "0s"
runners = ["x", "y", "z"]
fairness = "fifo"
"#,
    );

    let run = temp
        .baton()
        .args(&["--config", "conf/race.toml", "race", "--json"])
        .passes();
    let summary = run.json();
    assert_eq!(summary["goal"], 4);
    assert_eq!(summary["standings"].as_array().unwrap().len(), 3);
}

#[test]
fn unknown_keys_are_rejected() {
    let temp = Project::empty();
    temp.file("baton.toml", "[light]\ncolour = \"red\"\n");

    temp.baton()
        .args(&["--config", "baton.toml", "light"])
        .fails()
        .stderr_has("colour");
}
