// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake world adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MemoryWorld, WorldAdapter, WorldError};
use async_trait::async_trait;
use rc_core::{ContainerId, ContainerKind, ItemHandle, ItemId, Point};
use std::collections::{HashMap, HashSet};
use std::ops::Deref;
use std::sync::{Arc, Mutex};

/// Recorded world call
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCall {
    Contents {
        container: ContainerId,
    },
    ItemId {
        item: ItemHandle,
    },
    RemoveItem {
        container: ContainerId,
        item: ItemHandle,
    },
    TryInsertItem {
        container: ContainerId,
        item: ItemId,
    },
    DropItem {
        item: ItemId,
        position: Point,
    },
    Position {
        container: ContainerId,
    },
    ContainersOfKind {
        kind: ContainerKind,
    },
}

#[derive(Default)]
struct Faults {
    removal_fails: bool,
    drop_fails: bool,
    /// Handles whose item id lookup is refused
    unreadable: HashSet<ItemHandle>,
    /// Remaining units of an item a container will still accept
    limits: HashMap<(ContainerId, ItemId), usize>,
}

/// In-memory world with call recording and failure injection
///
/// Derefs to [`MemoryWorld`] for host-side setup (spawning containers,
/// putting and taking items).
#[derive(Clone, Default)]
pub struct FakeWorld {
    world: MemoryWorld,
    calls: Arc<Mutex<Vec<WorldCall>>>,
    faults: Arc<Mutex<Faults>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<WorldCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Make every `remove_item` fail with a host rejection
    pub fn set_removal_fails(&self, fails: bool) {
        self.faults.lock().unwrap_or_else(|e| e.into_inner()).removal_fails = fails;
    }

    /// Make every `drop_item` fail
    pub fn set_drop_fails(&self, fails: bool) {
        self.faults.lock().unwrap_or_else(|e| e.into_inner()).drop_fails = fails;
    }

    /// Make `item_id` fail with a host rejection for one handle
    pub fn set_item_unreadable(&self, item: ItemHandle) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unreadable
            .insert(item);
    }

    /// Accept at most `remaining` more units of `item` into `container`,
    /// regardless of free slots. Emulates slots that only fit some item sizes.
    pub fn limit_item(&self, container: ContainerId, item: ItemId, remaining: usize) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .limits
            .insert((container, item), remaining);
    }

    /// Report `container` as full for `item` only
    pub fn reject_item(&self, container: ContainerId, item: ItemId) {
        self.limit_item(container, item, 0);
    }

    fn record(&self, call: WorldCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl Deref for FakeWorld {
    type Target = MemoryWorld;

    fn deref(&self) -> &MemoryWorld {
        &self.world
    }
}

#[async_trait]
impl WorldAdapter for FakeWorld {
    async fn contents(&self, container: ContainerId) -> Result<Vec<ItemHandle>, WorldError> {
        self.record(WorldCall::Contents { container });
        self.world.contents(container).await
    }

    async fn item_id(&self, item: ItemHandle) -> Result<ItemId, WorldError> {
        self.record(WorldCall::ItemId { item });
        if self
            .faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unreadable
            .contains(&item)
        {
            return Err(WorldError::Rejected(format!("{} is unreadable", item)));
        }
        self.world.item_id(item).await
    }

    async fn remove_item(
        &self,
        container: ContainerId,
        item: ItemHandle,
    ) -> Result<(), WorldError> {
        self.record(WorldCall::RemoveItem { container, item });
        if self.faults.lock().unwrap_or_else(|e| e.into_inner()).removal_fails {
            return Err(WorldError::Rejected(format!(
                "removal of {} from {} refused",
                item, container
            )));
        }
        self.world.remove_item(container, item).await
    }

    async fn try_insert_item(
        &self,
        container: ContainerId,
        item: ItemId,
    ) -> Result<bool, WorldError> {
        self.record(WorldCall::TryInsertItem { container, item });
        let limited = self
            .faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .limits
            .contains_key(&(container, item));
        if !limited {
            return self.world.try_insert_item(container, item).await;
        }

        // Check and consume the allowance in one step
        let allowed = {
            let mut faults = self.faults.lock().unwrap_or_else(|e| e.into_inner());
            match faults.limits.get_mut(&(container, item)) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };
        if !allowed {
            return Ok(false);
        }
        self.world.try_insert_item(container, item).await
    }

    async fn drop_item(&self, item: ItemId, position: Point) -> Result<(), WorldError> {
        self.record(WorldCall::DropItem { item, position });
        if self.faults.lock().unwrap_or_else(|e| e.into_inner()).drop_fails {
            return Err(WorldError::Rejected(format!("drop of {} refused", item)));
        }
        self.world.drop_item(item, position).await
    }

    async fn position(&self, container: ContainerId) -> Result<Point, WorldError> {
        self.record(WorldCall::Position { container });
        self.world.position(container).await
    }

    async fn containers_of_kind(
        &self,
        kind: ContainerKind,
    ) -> Result<Vec<ContainerId>, WorldError> {
        self.record(WorldCall::ContainersOfKind { kind });
        self.world.containers_of_kind(kind).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
