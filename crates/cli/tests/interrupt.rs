// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests for Ctrl-C handling
//!
//! A long-running demo must stop its tasks and exit cleanly on SIGINT.

#![cfg(unix)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

fn spawn_baton(args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_baton"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn baton")
}

/// Block until the child prints `count` lines, returning them
fn read_lines(reader: &mut impl BufRead, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            line.trim_end().to_string()
        })
        .collect()
}

fn interrupt(child: &Child) {
    // Give the runtime a moment to install its Ctrl-C listener
    std::thread::sleep(Duration::from_millis(300));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();
}

fn wait_with_deadline(child: &mut Child, deadline: Duration) -> ExitStatus {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if started.elapsed() > deadline {
            child.kill().ok();
            panic!("baton did not exit within {:?}", deadline);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn interrupted_light_exits_cleanly() {
    let mut child = spawn_baton(&["light", "--red", "1h", "--run-for", "1h"]);
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    assert_eq!(read_lines(&mut stdout, 1), ["Color: RED"]);
    interrupt(&child);

    let status = wait_with_deadline(&mut child, Duration::from_secs(10));
    assert!(status.success(), "exit status: {:?}", status);
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(rest.is_empty(), "unexpected output after interrupt: {}", rest);
}

#[test]
fn interrupted_lab_cancels_every_session() {
    let mut child = spawn_baton(&["lab", "--stations", "2", "--students", "3", "--usage", "1h"]);
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let started = read_lines(&mut stdout, 2);
    assert!(started.iter().all(|l| l.contains("has started")), "{:?}", started);
    interrupt(&child);

    let status = wait_with_deadline(&mut child, Duration::from_secs(10));
    assert!(status.success(), "exit status: {:?}", status);
    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    assert!(!rest.contains("has finished"), "{}", rest);
}

#[test]
fn interrupted_race_reports_no_winner() {
    let mut child = spawn_baton(&[
        "race", "--goal", "1000000", "--step", "1", "--pause", "1h", "--json",
    ]);
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    // Progress is muted by --json; give both runners time to take a turn
    std::thread::sleep(Duration::from_millis(200));
    interrupt(&child);

    let status = wait_with_deadline(&mut child, Duration::from_secs(10));
    assert!(status.success(), "exit status: {:?}", status);
    let mut json = String::new();
    stdout.read_to_string(&mut json).unwrap();
    assert!(json.contains("\"winner\": null"), "{}", json);
}
