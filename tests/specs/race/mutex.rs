//! Mutex race specs
//!
//! Turn order is unspecified; exactly one winner is.

use crate::prelude::*;

#[test]
fn many_runners_produce_one_winner() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&[
            "race", "--mode", "mutex", "--goal", "6", "--step", "2", "--pause", "0s",
            "--runners", "a", "b", "c", "d",
        ])
        .passes();

    let lines = run.stdout_lines();
    let wins: Vec<&String> = lines.iter().filter(|l| l.ends_with("won the race!")).collect();
    assert_eq!(wins.len(), 1);
    assert_eq!(lines.last(), Some(wins[0]));
}

#[test]
fn fifo_fairness_still_yields_one_winner() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&[
            "race", "--mode", "mutex", "--fairness", "fifo", "--goal", "5", "--step", "5",
            "--pause", "0s", "--runners", "p", "q", "--json",
        ])
        .passes();

    let summary = run.json();
    assert!(summary["winner"].is_string());
    assert_eq!(summary["turns"], 1);
}
