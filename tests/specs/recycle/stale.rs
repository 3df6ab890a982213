//! Stale reference specs
//!
//! Items or containers that disappear while an item waits out its delay are
//! skipped without producing outputs.

use crate::prelude::*;
use similar_asserts::assert_eq;

const SLOW_RECIPES: &str = r#"
[containers]
input = 36628
output = 36629

[engine]
idle_timeout = "50ms"

[[recipe]]
item = 121
delay = "400ms"
outputs = [{ item = 67, amount = 5 }]
"#;

#[test]
fn item_taken_during_delay_is_not_recycled() {
    let out = Scenario::with_recipes(SLOW_RECIPES).run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 121),
        wait(50),
        take(1, 121),
    ]);

    assert_eq!(out.items_in(1), Vec::<u64>::new());
    assert_eq!(out.items_in(2), Vec::<u64>::new());
    assert!(out.events_of("recycled").is_empty());
    assert_eq!(out.events_of("skipped")[0]["reason"], "vanished");
    out.stderr_has("item removed before recycling could occur");
}

#[test]
fn destroyed_container_abandons_its_queue() {
    let out = Scenario::with_recipes(SLOW_RECIPES).run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 121),
        put(1, 121),
        wait(50),
        destroy(1),
    ]);

    assert_eq!(out.items_in(2), Vec::<u64>::new());
    assert!(out.events_of("recycled").is_empty());
    assert_eq!(out.events_of("worker_stopped")[0]["reason"], "unregistered");
    let ids: Vec<_> = out.snapshot()["containers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2]);
}
