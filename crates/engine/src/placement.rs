// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output container selection

use rc_adapters::{WorldAdapter, WorldError};
use rc_core::{ContainerId, ContainerKind, Point};

/// The output container chosen for a recycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub container: ContainerId,
    pub position: Point,
    pub distance: f32,
}

/// Pick the candidate closest to `origin`. Ties keep the earliest candidate.
pub fn nearest(
    origin: Point,
    candidates: impl IntoIterator<Item = (ContainerId, Point)>,
) -> Option<Target> {
    let mut best: Option<Target> = None;
    for (container, position) in candidates {
        let distance = origin.distance(&position);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Target {
                container,
                position,
                distance,
            });
        }
    }
    best
}

/// Find the nearest container of `kind` to `origin`
///
/// Candidates that disappear between enumeration and the position lookup are
/// skipped. `Ok(None)` means no container of that kind exists.
pub async fn find_nearest<W: WorldAdapter>(
    world: &W,
    origin: Point,
    kind: ContainerKind,
) -> Result<Option<Target>, WorldError> {
    let mut candidates = Vec::new();
    for container in world.containers_of_kind(kind).await? {
        match world.position(container).await {
            Ok(position) => candidates.push((container, position)),
            Err(WorldError::ContainerNotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(nearest(origin, candidates))
}

#[cfg(test)]
#[path = "placement_tests.rs"]
mod tests;
