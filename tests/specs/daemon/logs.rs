//! Daemon logs specs
//!
//! Verify where the daemon writes its logs.

use crate::prelude::*;

#[test]
fn log_file_receives_startup_marker_and_logs() {
    let scenario = Scenario::fast();
    let log = scenario.path("logs/recyclerd.log");

    let out = scenario
        .recyclerd()
        .args(&["--log-file", log.to_str().unwrap()])
        .script(&[spawn(36628, [0.0, 0.0, 0.0], 4)])
        .passes();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("recyclerd: starting"), "{}", content);
    assert!(content.contains("Daemon ready"), "{}", content);
    assert!(content.contains("recycler registered"), "{}", content);
    assert!(!out.stderr.contains("Daemon ready"));
}

#[test]
fn logs_go_to_stderr_by_default() {
    let out = Scenario::fast()
        .recyclerd()
        .script(&[spawn(36628, [0.0, 0.0, 0.0], 4)])
        .passes();

    out.stderr_has("Daemon ready").stderr_has("recycler registered");
    // stdout carries only JSON lines
    out.snapshot();
}
