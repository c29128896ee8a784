//! Workstation lab specs
//!
//! Every student gets a station once; no station is used twice at a time.

use crate::prelude::*;

#[test]
fn every_student_starts_and_finishes() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&["lab", "--stations", "2", "--students", "4", "--usage", "0s"])
        .passes();

    let lines = run.stdout_lines();
    assert_eq!(lines.len(), 8);
    for student in 1..=4 {
        let started = format!("The student {} has started using a workstation", student);
        let finished = format!("The student {} has finished with the workstation", student);
        assert!(lines.contains(&started), "{:?}", lines);
        assert!(lines.contains(&finished), "{:?}", lines);
    }
}

#[test]
fn numbered_report_names_valid_stations() {
    let temp = Project::empty();

    let run = temp
        .baton()
        .args(&[
            "lab", "--stations", "3", "--students", "5", "--usage", "5ms", "--numbered",
        ])
        .passes();

    let lines = run.stdout_lines();
    assert_eq!(lines.len(), 10);
    for line in &lines {
        let station: usize = line.rsplit(' ').next().unwrap().parse().unwrap();
        assert!((1..=3).contains(&station), "{}", line);
    }
}
