//! Basic recycling specs
//!
//! An item placed in an input container is consumed after its delay and its
//! outputs appear in the output container.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn scrap_becomes_fragments_in_output_container() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 121),
    ]);

    assert_eq!(
        out.snapshot(),
        json!({
            "type": "snapshot",
            "containers": [
                { "id": 1, "kind": 36628, "items": [] },
                { "id": 2, "kind": 36629, "items": [67, 67, 67, 67, 67] },
            ],
            "dropped": [],
        })
    );
}

#[test]
fn event_stream_reports_the_worker_lifecycle() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 121),
    ]);

    let kinds: Vec<_> = out
        .events()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        kinds,
        vec!["enqueued", "worker_started", "recycled", "worker_stopped"]
    );
    assert_eq!(
        out.events_of("recycled")[0],
        json!({
            "type": "recycled",
            "container": 1,
            "handle": 1,
            "item": 121,
            "target": 2,
            "inserted": 5,
            "dropped": 0,
            "lost": 0,
        })
    );
    assert_eq!(out.events_of("worker_stopped")[0]["reason"], "idle");
}

#[test]
fn recycled_ids_recipe_shape_is_supported() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 363),
    ]);

    assert_eq!(out.items_in(2), vec![67, 67, 67, 68]);
}

#[test]
fn queued_items_are_all_recycled_by_one_worker() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 20),
        put(1, 121),
        put(1, 363),
        put(1, 121),
    ]);

    assert_eq!(out.items_in(1), Vec::<u64>::new());
    assert_eq!(out.items_in(2).len(), 14);
    assert_eq!(out.events_of("worker_started").len(), 1);
    let handles: Vec<_> = out
        .events_of("recycled")
        .iter()
        .map(|e| e["handle"].as_u64().unwrap())
        .collect();
    assert_eq!(handles, vec![1, 2, 3]);
}

#[test]
fn unrecognized_items_stay_put() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 5),
    ]);

    assert_eq!(out.items_in(1), vec![5]);
    assert!(out.events().is_empty());
}

#[test]
fn default_recipes_recycle_into_the_same_kind() {
    let out = Scenario::defaults().run(&[spawn(36628, [0.0, 0.0, 0.0], 12), put(1, 121)]);

    assert_eq!(out.items_in(1), vec![67, 67, 67, 67, 67]);
}

#[test]
fn world_loaded_does_not_reregister_tracked_containers() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 0.0, 0.0], 12),
        put(1, 121),
        world_loaded(),
    ]);

    assert_eq!(out.events_of("enqueued").len(), 1);
    assert_eq!(out.events_of("recycled").len(), 1);
    assert_eq!(out.items_in(2), vec![67, 67, 67, 67, 67]);
}
