// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::world::{WorldAdapter, WorldError};
use async_trait::async_trait;
use rc_core::{ContainerId, ContainerKind, ItemHandle, ItemId, Point};
use tracing::Instrument;

/// Wrapper that adds tracing to any WorldAdapter
#[derive(Clone)]
pub struct TracedWorldAdapter<W> {
    inner: W,
}

impl<W> TracedWorldAdapter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

#[async_trait]
impl<W: WorldAdapter> WorldAdapter for TracedWorldAdapter<W> {
    async fn contents(&self, container: ContainerId) -> Result<Vec<ItemHandle>, WorldError> {
        let result = self.inner.contents(container).await;
        tracing::trace!(
            %container,
            count = result.as_ref().map(|c| c.len()).ok(),
            "contents"
        );
        result
    }

    async fn item_id(&self, item: ItemHandle) -> Result<ItemId, WorldError> {
        let result = self.inner.item_id(item).await;
        tracing::trace!(%item, id = ?result.as_ref().ok(), "item id");
        result
    }

    async fn remove_item(
        &self,
        container: ContainerId,
        item: ItemHandle,
    ) -> Result<(), WorldError> {
        let span = tracing::info_span!("world.remove_item", %container, %item);
        let start = std::time::Instant::now();
        let result = self
            .inner
            .remove_item(container, item)
            .instrument(span.clone())
            .await;
        let elapsed = start.elapsed();
        let _guard = span.enter();

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "removed"),
            // The item may legitimately be gone already
            Err(WorldError::ItemNotFound(_)) => tracing::debug!("item already gone"),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "remove failed"
            ),
        }

        result
    }

    async fn try_insert_item(
        &self,
        container: ContainerId,
        item: ItemId,
    ) -> Result<bool, WorldError> {
        let span = tracing::info_span!("world.insert", %container, %item);
        let result = self
            .inner
            .try_insert_item(container, item)
            .instrument(span.clone())
            .await;
        let _guard = span.enter();
        match &result {
            Ok(true) => tracing::debug!("inserted"),
            Ok(false) => tracing::debug!("container full"),
            Err(e) => tracing::warn!(error = %e, "insert failed"),
        }

        result
    }

    async fn drop_item(&self, item: ItemId, position: Point) -> Result<(), WorldError> {
        let span = tracing::info_span!("world.drop_item", %item);
        let result = self
            .inner
            .drop_item(item, position)
            .instrument(span.clone())
            .await;
        let _guard = span.enter();
        match &result {
            Ok(()) => tracing::debug!(?position, "dropped"),
            Err(e) => tracing::warn!(?position, error = %e, "drop failed"),
        }

        result
    }

    async fn position(&self, container: ContainerId) -> Result<Point, WorldError> {
        let result = self.inner.position(container).await;
        tracing::trace!(%container, position = ?result.as_ref().ok(), "position");
        result
    }

    async fn containers_of_kind(
        &self,
        kind: ContainerKind,
    ) -> Result<Vec<ContainerId>, WorldError> {
        let span = tracing::info_span!("world.containers_of_kind", %kind);
        let start = std::time::Instant::now();
        let result = self
            .inner
            .containers_of_kind(kind)
            .instrument(span.clone())
            .await;
        let _guard = span.enter();
        tracing::debug!(
            found = result.as_ref().map(|c| c.len()).ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scanned"
        );
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
