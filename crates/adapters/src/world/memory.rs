// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory host world
//!
//! Holds containers with a fixed number of unit slots and publishes
//! [`HostEvent`]s to subscribers whenever anything changes, including changes
//! made through the [`WorldAdapter`] interface.

use super::{WorldAdapter, WorldError};
use async_trait::async_trait;
use rc_core::{ContainerId, ContainerKind, HostEvent, ItemHandle, ItemId, Point};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// An item lying loose in the world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedItem {
    pub item: ItemId,
    pub position: Point,
}

/// Serializable view of one container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSnapshot {
    pub id: ContainerId,
    pub kind: ContainerKind,
    pub items: Vec<ItemId>,
}

/// Serializable view of the whole world
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub containers: Vec<ContainerSnapshot>,
    pub dropped: Vec<DroppedItem>,
}

struct MemoryContainer {
    kind: ContainerKind,
    position: Point,
    capacity: usize,
    items: Vec<ItemHandle>,
}

#[derive(Default)]
struct WorldState {
    next_container: u64,
    next_item: u64,
    containers: BTreeMap<ContainerId, MemoryContainer>,
    items: HashMap<ItemHandle, ItemId>,
    dropped: Vec<DroppedItem>,
    subscribers: Vec<mpsc::UnboundedSender<HostEvent>>,
}

impl WorldState {
    fn emit(&mut self, event: HostEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn insert(
        &mut self,
        container: ContainerId,
        item: ItemId,
    ) -> Result<Option<ItemHandle>, WorldError> {
        let next = self.next_item + 1;
        let slot = self
            .containers
            .get_mut(&container)
            .ok_or(WorldError::ContainerNotFound(container))?;
        if slot.items.len() >= slot.capacity {
            return Ok(None);
        }

        let handle = ItemHandle(next);
        slot.items.push(handle);
        self.next_item = next;
        self.items.insert(handle, item);
        self.emit(HostEvent::ContentsChanged { container });
        Ok(Some(handle))
    }

    fn remove(&mut self, container: ContainerId, handle: ItemHandle) -> Result<(), WorldError> {
        let slot = self
            .containers
            .get_mut(&container)
            .ok_or(WorldError::ContainerNotFound(container))?;
        let index = slot
            .items
            .iter()
            .position(|h| *h == handle)
            .ok_or(WorldError::ItemNotFound(handle))?;

        slot.items.remove(index);
        self.items.remove(&handle);
        self.emit(HostEvent::ContentsChanged { container });
        Ok(())
    }
}

/// Shared in-memory world
#[derive(Clone, Default)]
pub struct MemoryWorld {
    state: Arc<Mutex<WorldState>>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WorldState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Receive every host event emitted from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<HostEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Announce that the world finished loading
    pub fn announce_loaded(&self) {
        self.lock().emit(HostEvent::WorldLoaded);
    }

    /// Place a new container with room for `capacity` item units
    pub fn spawn_container(
        &self,
        kind: ContainerKind,
        position: Point,
        capacity: usize,
    ) -> ContainerId {
        let mut state = self.lock();
        state.next_container += 1;
        let id = ContainerId(state.next_container);
        state.containers.insert(
            id,
            MemoryContainer {
                kind,
                position,
                capacity,
                items: Vec::new(),
            },
        );
        state.emit(HostEvent::ContainerSpawned {
            container: id,
            kind,
        });
        id
    }

    /// Destroy a container along with everything inside it
    pub fn destroy_container(&self, id: ContainerId) -> bool {
        let mut state = self.lock();
        let Some(container) = state.containers.remove(&id) else {
            return false;
        };
        for handle in &container.items {
            state.items.remove(handle);
        }
        state.emit(HostEvent::ContainerDestroyed { container: id });
        true
    }

    /// Put one unit into a container as a player would. `None` if full or missing.
    pub fn put_item(&self, container: ContainerId, item: ItemId) -> Option<ItemHandle> {
        self.lock().insert(container, item).ok().flatten()
    }

    /// Take the first unit of `item` out of a container as a player would
    pub fn take_item(&self, container: ContainerId, item: ItemId) -> Option<ItemHandle> {
        let mut state = self.lock();
        let handle = {
            let slot = state.containers.get(&container)?;
            slot.items
                .iter()
                .copied()
                .find(|h| state.items.get(h) == Some(&item))?
        };
        state.remove(container, handle).ok().map(|()| handle)
    }

    /// Item types inside a container, in slot order
    pub fn items_in(&self, container: ContainerId) -> Vec<ItemId> {
        let state = self.lock();
        state
            .containers
            .get(&container)
            .map(|slot| {
                slot.items
                    .iter()
                    .filter_map(|h| state.items.get(h).copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of `item` units inside a container
    pub fn count_of(&self, container: ContainerId, item: ItemId) -> usize {
        self.items_in(container)
            .into_iter()
            .filter(|i| *i == item)
            .count()
    }

    /// Everything dropped loose in the world so far
    pub fn dropped(&self) -> Vec<DroppedItem> {
        self.lock().dropped.clone()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let state = self.lock();
        let containers = state
            .containers
            .iter()
            .map(|(id, slot)| ContainerSnapshot {
                id: *id,
                kind: slot.kind,
                items: slot
                    .items
                    .iter()
                    .filter_map(|h| state.items.get(h).copied())
                    .collect(),
            })
            .collect();
        WorldSnapshot {
            containers,
            dropped: state.dropped.clone(),
        }
    }
}

#[async_trait]
impl WorldAdapter for MemoryWorld {
    async fn contents(&self, container: ContainerId) -> Result<Vec<ItemHandle>, WorldError> {
        self.lock()
            .containers
            .get(&container)
            .map(|slot| slot.items.clone())
            .ok_or(WorldError::ContainerNotFound(container))
    }

    async fn item_id(&self, item: ItemHandle) -> Result<ItemId, WorldError> {
        self.lock()
            .items
            .get(&item)
            .copied()
            .ok_or(WorldError::ItemNotFound(item))
    }

    async fn remove_item(
        &self,
        container: ContainerId,
        item: ItemHandle,
    ) -> Result<(), WorldError> {
        self.lock().remove(container, item)
    }

    async fn try_insert_item(
        &self,
        container: ContainerId,
        item: ItemId,
    ) -> Result<bool, WorldError> {
        self.lock().insert(container, item).map(|h| h.is_some())
    }

    async fn drop_item(&self, item: ItemId, position: Point) -> Result<(), WorldError> {
        self.lock().dropped.push(DroppedItem { item, position });
        Ok(())
    }

    async fn position(&self, container: ContainerId) -> Result<Point, WorldError> {
        self.lock()
            .containers
            .get(&container)
            .map(|slot| slot.position)
            .ok_or(WorldError::ContainerNotFound(container))
    }

    async fn containers_of_kind(
        &self,
        kind: ContainerKind,
    ) -> Result<Vec<ContainerId>, WorldError> {
        Ok(self
            .lock()
            .containers
            .iter()
            .filter(|(_, slot)| slot.kind == kind)
            .map(|(id, _)| *id)
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
