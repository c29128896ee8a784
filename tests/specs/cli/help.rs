//! Help and usage specs

use crate::prelude::*;

#[test]
fn help_lists_every_demo() {
    let temp = Project::empty();

    temp.baton()
        .args(&["--help"])
        .passes()
        .stdout_has("light")
        .stdout_has("race")
        .stdout_has("lab");
}

#[test]
fn race_help_lists_modes() {
    let temp = Project::empty();

    temp.baton()
        .args(&["race", "--help"])
        .passes()
        .stdout_has("alternating")
        .stdout_has("mutex");
}

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();

    temp.baton()
        .args(&["juggle"])
        .fails()
        .stderr_has("unrecognized subcommand");
}
