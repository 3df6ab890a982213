// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications the host world delivers to the engine

use crate::ids::{ContainerId, ContainerKind};
use serde::{Deserialize, Serialize};

/// Host notifications consumed by the recycler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The world finished loading; containers that already exist can be scanned
    WorldLoaded,
    /// A container instance appeared
    ContainerSpawned {
        container: ContainerId,
        kind: ContainerKind,
    },
    /// A container instance was destroyed
    ContainerDestroyed { container: ContainerId },
    /// Something inside the container changed (insert, removal, move)
    ContentsChanged { container: ContainerId },
}

impl HostEvent {
    /// The container this event concerns, if any
    pub fn container(&self) -> Option<ContainerId> {
        match self {
            HostEvent::WorldLoaded => None,
            HostEvent::ContainerSpawned { container, .. }
            | HostEvent::ContainerDestroyed { container }
            | HostEvent::ContentsChanged { container } => Some(*container),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
