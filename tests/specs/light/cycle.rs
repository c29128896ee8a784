//! Traffic light specs
//!
//! Colors always appear in RED, GREEN, AMBER order.

use crate::prelude::*;

const INSTANT: [&str; 6] = ["--red", "0s", "--green", "0s", "--amber", "0s"];

#[test]
fn rotations_print_colors_in_order() {
    let temp = Project::empty();
    let mut args = vec!["light"];
    args.extend(INSTANT);
    args.extend(["--rotations", "3"]);

    temp.baton()
        .args(&args)
        .passes()
        .stdout_eq(&"Color: RED\nColor: GREEN\nColor: AMBER\n".repeat(3));
}

#[test]
fn run_for_stops_a_timed_light() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&[
            "light", "--red", "20ms", "--green", "20ms", "--amber", "20ms", "--run-for", "300ms",
        ])
        .passes();

    let lines = run.stdout_lines();
    assert!(!lines.is_empty());
    for (i, line) in lines.iter().enumerate() {
        let expected = ["Color: RED", "Color: GREEN", "Color: AMBER"][i % 3];
        assert_eq!(line, expected);
    }
}

#[test]
fn run_for_conflicts_with_rotations() {
    let temp = Project::empty();

    temp.baton()
        .args(&["light", "--run-for", "1s", "--rotations", "1"])
        .fails()
        .stderr_has("cannot be used with");
}

#[test]
fn logs_go_to_stderr_only() {
    let temp = Project::empty();
    let mut args = vec!["--log-level", "info", "light"];
    args.extend(INSTANT);
    args.extend(["--rotations", "1"]);

    temp.baton()
        .args(&args)
        .passes()
        .stdout_eq("Color: RED\nColor: GREEN\nColor: AMBER\n")
        .stderr_has("cycle started");
}

#[test]
fn single_gate_variant_prints_the_same_rotation() {
    let temp = Project::empty();
    let mut args = vec!["light", "--variant", "single"];
    args.extend(INSTANT);
    args.extend(["--rotations", "2"]);

    temp.baton()
        .args(&args)
        .passes()
        .stdout_eq(&"Color: RED\nColor: GREEN\nColor: AMBER\n".repeat(2));
}

#[test]
fn variant_can_come_from_the_config_file() {
    let temp = Project::empty();
    temp.file(
        "baton.toml",
        "[light]\nvariant = \"single\"\nred = \"0s\"\ngreen = \"0s\"\namber = \"0s\"\nrotations = 1\n",
    );

    temp.baton()
        .args(&["--config", "baton.toml", "--log-level", "info", "light"])
        .passes()
        .stdout_eq("Color: RED\nColor: GREEN\nColor: AMBER\n")
        .stderr_has("single-gate cycle started");
}

#[test]
fn unknown_variant_is_rejected() {
    let temp = Project::empty();

    temp.baton()
        .args(&["light", "--variant", "double"])
        .fails()
        .stderr_has("invalid value");
}
