// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host world adapter: container inventories, positions and world drops

mod memory;

pub use memory::{ContainerSnapshot, DroppedItem, MemoryWorld, WorldSnapshot};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorld, WorldCall};

use async_trait::async_trait;
use rc_core::{ContainerId, ContainerKind, ItemHandle, ItemId, Point};
use thiserror::Error;

/// Errors from host world operations
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("container not found: {0}")]
    ContainerNotFound(ContainerId),
    #[error("item not found: {0}")]
    ItemNotFound(ItemHandle),
    #[error("host rejected operation: {0}")]
    Rejected(String),
}

/// Adapter for the host's containers
///
/// Every operation is atomic on the host side. In particular `remove_item`
/// fails with [`WorldError::ItemNotFound`] when the item is already gone, so
/// two removals of the same handle can never both succeed.
#[async_trait]
pub trait WorldAdapter: Clone + Send + Sync + 'static {
    /// Current item handles inside a container
    async fn contents(&self, container: ContainerId) -> Result<Vec<ItemHandle>, WorldError>;

    /// Item type behind a handle
    async fn item_id(&self, item: ItemHandle) -> Result<ItemId, WorldError>;

    /// Remove one item unit from a container
    async fn remove_item(&self, container: ContainerId, item: ItemHandle)
        -> Result<(), WorldError>;

    /// Insert one fresh unit of `item`. `Ok(false)` means the container is full.
    async fn try_insert_item(&self, container: ContainerId, item: ItemId)
        -> Result<bool, WorldError>;

    /// Materialize one unit of `item` loose in the world
    async fn drop_item(&self, item: ItemId, position: Point) -> Result<(), WorldError>;

    /// World position of a container
    async fn position(&self, container: ContainerId) -> Result<Point, WorldError>;

    /// All live containers of a kind, in a stable order
    async fn containers_of_kind(&self, kind: ContainerKind)
        -> Result<Vec<ContainerId>, WorldError>;
}
