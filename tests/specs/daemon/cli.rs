//! Daemon command-line specs

use crate::prelude::*;

#[test]
fn help_describes_options() {
    let out = Scenario::defaults().recyclerd().args(&["--help"]).passes();
    assert!(out.stdout.contains("--config"));
    assert!(out.stdout.contains("--log-file"));
}

#[test]
fn empty_input_prints_empty_snapshot() {
    let out = Scenario::fast().recyclerd().stdin("").passes();
    assert_eq!(
        out.snapshot(),
        json!({ "type": "snapshot", "containers": [], "dropped": [] })
    );
}

#[test]
fn invalid_config_fails_to_start() {
    Scenario::with_recipes("[containers]\ninput = 1\n")
        .recyclerd()
        .stdin("")
        .fails()
        .stderr_has("output");
}

#[test]
fn missing_config_fails_to_start() {
    Scenario::defaults()
        .recyclerd()
        .args(&["--config", "/nonexistent/recipes.toml"])
        .stdin("")
        .fails();
}

#[test]
fn malformed_lines_are_skipped() {
    let script = concat!(
        "{\"op\":\"spawn\",\"kind\":36628,\"at\":[0,0,0],\"capacity\":4}\n",
        "this is not json\n",
        "{\"op\":\"put\",\"container\":99,\"item\":121}\n",
        "\n",
        "{\"op\":\"put\",\"container\":1,\"item\":5}\n",
    );
    let out = Scenario::fast().recyclerd().stdin(script).passes();

    assert_eq!(out.items_in(1), vec![5]);
    out.stderr_has("skipping command");
}
