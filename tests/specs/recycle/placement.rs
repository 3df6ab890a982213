//! Output placement specs
//!
//! Outputs go to the nearest output container; what does not fit is dropped
//! into the world above it; with no output container they are lost.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn nearest_output_container_receives_outputs() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [5.0, 0.0, 0.0], 12),
        spawn(36629, [0.0, 2.0, 0.0], 12),
        spawn(36629, [0.0, 0.0, 9.0], 12),
        put(1, 121),
    ]);

    assert_eq!(out.items_in(2), Vec::<u64>::new());
    assert_eq!(out.items_in(3), vec![67, 67, 67, 67, 67]);
    assert_eq!(out.items_in(4), Vec::<u64>::new());
}

#[test]
fn overflow_is_dropped_above_the_target() {
    let out = Scenario::fast().run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [4.0, 1.0, 0.0], 3),
        put(1, 121),
    ]);

    assert_eq!(out.items_in(2), vec![67, 67, 67]);
    assert_eq!(
        out.dropped(),
        vec![
            json!({ "item": 67, "position": [4.0, 3.0, 0.0] }),
            json!({ "item": 67, "position": [4.0, 3.0, 0.0] }),
        ]
    );
    let recycled = &out.events_of("recycled")[0];
    assert_eq!(recycled["inserted"], 3);
    assert_eq!(recycled["dropped"], 2);
}

#[test]
fn drop_height_is_configurable() {
    let recipes = FAST_RECIPES.replace("[engine]\n", "[engine]\ndrop_height = 0.5\n");
    let out = Scenario::with_recipes(&recipes).run(&[
        spawn(36628, [0.0, 0.0, 0.0], 12),
        spawn(36629, [1.0, 1.0, 1.0], 0),
        put(1, 363),
    ]);

    let dropped = out.dropped();
    assert_eq!(dropped.len(), 4);
    assert!(dropped
        .iter()
        .all(|d| d["position"] == json!([1.0, 1.5, 1.0])));
}

#[test]
fn without_output_container_outputs_are_lost() {
    let out = Scenario::fast().run(&[spawn(36628, [0.0, 0.0, 0.0], 12), put(1, 121)]);

    assert_eq!(out.items_in(1), Vec::<u64>::new());
    assert!(out.dropped().is_empty());
    let recycled = &out.events_of("recycled")[0];
    assert_eq!(recycled["target"], json!(null));
    assert_eq!(recycled["lost"], 5);
    out.stderr_has("no output container found nearby");
}
