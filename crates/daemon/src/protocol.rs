// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line protocol for the replay host
//!
//! Each stdin line is one JSON [`HostCommand`]. Output lines are JSON
//! recycle events followed by a final [`SnapshotLine`].

use rc_adapters::{MemoryWorld, WorldSnapshot};
use rc_core::{ContainerId, ContainerKind, ItemId, Point};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Capacity of a spawned container when the command does not say
pub const DEFAULT_CAPACITY: usize = 12;

/// Longest pause a `wait` command may request (one day)
pub const MAX_WAIT_MS: u64 = 24 * 60 * 60 * 1000;

/// A change to the simulated world, as a player or the host would make it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCommand {
    Spawn {
        kind: ContainerKind,
        at: Point,
        #[serde(default = "default_capacity")]
        capacity: usize,
    },
    Put {
        container: ContainerId,
        item: ItemId,
    },
    Take {
        container: ContainerId,
        item: ItemId,
    },
    Destroy {
        container: ContainerId,
    },
    WorldLoaded,
    /// Pause before reading the next command
    Wait {
        ms: u64,
    },
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// What applying a command asks of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Done,
    Pause(Duration),
}

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid command: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

impl HostCommand {
    /// Apply the command to the world
    pub fn apply(&self, world: &MemoryWorld) -> Result<Applied, ProtocolError> {
        match *self {
            HostCommand::Spawn { kind, at, capacity } => {
                let id = world.spawn_container(kind, at, capacity);
                tracing::debug!(container = %id, %kind, "spawned");
            }
            HostCommand::Put { container, item } => {
                world.put_item(container, item).ok_or_else(|| {
                    ProtocolError::Rejected(format!(
                        "{} is full or missing, {} not put",
                        container, item
                    ))
                })?;
            }
            HostCommand::Take { container, item } => {
                world.take_item(container, item).ok_or_else(|| {
                    ProtocolError::Rejected(format!("{} holds no {}", container, item))
                })?;
            }
            HostCommand::Destroy { container } => {
                if !world.destroy_container(container) {
                    return Err(ProtocolError::Rejected(format!("{} does not exist", container)));
                }
            }
            HostCommand::WorldLoaded => world.announce_loaded(),
            HostCommand::Wait { ms } => {
                if ms > MAX_WAIT_MS {
                    return Err(ProtocolError::Rejected(format!(
                        "wait of {}ms exceeds {}ms",
                        ms, MAX_WAIT_MS
                    )));
                }
                return Ok(Applied::Pause(Duration::from_millis(ms)));
            }
        }
        Ok(Applied::Done)
    }
}

/// The last line printed: everything in the world once all work is done
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "snapshot")]
pub struct SnapshotLine {
    #[serde(flatten)]
    pub world: WorldSnapshot,
}

/// Parse one input line
pub fn decode_command(line: &str) -> Result<HostCommand, ProtocolError> {
    Ok(serde_json::from_str(line)?)
}

/// Encode a value as a single JSON line, without the trailing newline
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
