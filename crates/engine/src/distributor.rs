// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output placement
//!
//! Units are inserted one at a time so a full container only overflows the
//! units that do not fit. Overflow is dropped into the world above the target.

use crate::placement::Target;
use rc_adapters::WorldAdapter;
use rc_core::RecipeOutput;
use serde::Serialize;

/// Where the units of one recycle ended up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    /// Units placed in the target container
    pub inserted: u32,
    /// Units dropped into the world next to the target
    pub dropped: u32,
    /// Units that went nowhere
    pub lost: u32,
}

impl Distribution {
    pub fn total(&self) -> u32 {
        self.inserted
            .saturating_add(self.dropped)
            .saturating_add(self.lost)
    }
}

/// Place every unit of `outputs` into `target`, dropping what does not fit
///
/// With no target every unit is lost. Each unit is attempted independently;
/// an overflowing output never prevents the next one from being tried.
pub async fn distribute<W: WorldAdapter>(
    world: &W,
    outputs: &[RecipeOutput],
    target: Option<&Target>,
    drop_height: f32,
) -> Distribution {
    let Some(target) = target else {
        let lost = outputs
            .iter()
            .fold(0u32, |acc, o| acc.saturating_add(o.count));
        tracing::warn!(lost, "no output container found nearby, produced items are lost");
        return Distribution {
            lost,
            ..Distribution::default()
        };
    };

    let drop_point = target.position.above(drop_height);
    let mut report = Distribution::default();

    for output in outputs {
        for _ in 0..output.count {
            let inserted = match world.try_insert_item(target.container, output.item).await {
                Ok(inserted) => inserted,
                Err(e) => {
                    // Target vanished mid-distribution; its last position still stands
                    tracing::debug!(
                        error = %e,
                        item = %output.item,
                        "output container unavailable"
                    );
                    false
                }
            };
            if inserted {
                report.inserted += 1;
                continue;
            }

            tracing::info!(
                container = %target.container,
                item = %output.item,
                "storage full, dropping item in the world"
            );
            match world.drop_item(output.item, drop_point).await {
                Ok(()) => report.dropped += 1,
                Err(e) => {
                    tracing::warn!(error = %e, item = %output.item, "world drop failed, item lost");
                    report.lost += 1;
                }
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "distributor_tests.rs"]
mod tests;
