//! Alternating race specs
//!
//! Two runners take strict turns; the first seat moves first.

use crate::prelude::*;

#[test]
fn starter_reaching_goal_wins_on_first_turn() {
    let temp = Project::empty();

    temp.baton()
        .args(&[
            "race", "--goal", "10", "--step", "10", "--pause", "0s", "--runners", "A", "B",
        ])
        .passes()
        .stdout_eq("A advanced 10 meters. Total distance: 10 meters.\nA won the race!\n");
}

#[test]
fn runners_alternate_until_the_goal() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&[
            "race", "--goal", "3", "--step", "1", "--pause", "0s", "--runners", "Goku", "Vegeta",
        ])
        .passes();

    similar_asserts::assert_eq!(
        run.stdout_lines(),
        [
            "Goku advanced 1 meters. Total distance: 1 meters.",
            "Vegeta advanced 1 meters. Total distance: 1 meters.",
            "Goku advanced 1 meters. Total distance: 2 meters.",
            "Vegeta advanced 1 meters. Total distance: 2 meters.",
            "Goku advanced 1 meters. Total distance: 3 meters.",
            "Goku won the race!",
        ]
    );
}

#[test]
fn json_summary_reports_standings() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&[
            "race", "--goal", "4", "--step", "2", "--pause", "0s", "--runners", "A", "B", "--json",
        ])
        .passes();

    let summary = run.json();
    assert_eq!(summary["winner"], "A");
    assert_eq!(summary["turns"], 3);
    assert_eq!(summary["standings"][0]["name"], "A");
    assert_eq!(summary["standings"][0]["distance"], 4);
    assert_eq!(summary["standings"][1]["distance"], 2);
}
