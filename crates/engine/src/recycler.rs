// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recycler: turns host events into queued work and spawns workers

use crate::config::RecyclerConfig;
use crate::events::{EventBus, RecycleEvent};
use crate::registry::{ContainerQueue, QueueEntry, QueueRegistry};
use crate::watcher::Watcher;
use crate::worker::RecyclingWorker;
use crate::EngineError;
use rc_adapters::{WorldAdapter, WorldError};
use rc_core::{Catalog, Clock, ContainerId, HostEvent, ItemHandle};
use rc_recipes::RecipeConfig;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};

/// State shared between the recycler and its workers
pub(crate) struct Shared<W, C> {
    pub(crate) world: W,
    pub(crate) clock: C,
    pub(crate) config: RecyclerConfig,
    pub(crate) events: EventBus,
    /// Number of running workers
    pub(crate) active: watch::Sender<usize>,
}

/// Event-driven item recycler
///
/// Feed it every [`HostEvent`] through [`Recycler::handle_event`]. Workers run
/// as tokio tasks, so this must be used inside a tokio runtime.
pub struct Recycler<W, C> {
    shared: Arc<Shared<W, C>>,
    catalog: Catalog,
    registry: QueueRegistry,
    watcher: Mutex<Watcher>,
}

impl<W: WorldAdapter, C: Clock> Recycler<W, C> {
    pub fn new(world: W, catalog: Catalog, config: RecyclerConfig, clock: C) -> Self {
        let (active, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                world,
                clock,
                config,
                events: EventBus::default(),
                active,
            }),
            catalog,
            registry: QueueRegistry::new(),
            watcher: Mutex::new(Watcher::new()),
        }
    }

    /// Build a recycler from a parsed configuration file
    pub fn from_config(world: W, config: &RecipeConfig, clock: C) -> Self {
        Self::new(world, config.catalog(), RecyclerConfig::from(config), clock)
    }

    fn watcher(&self) -> MutexGuard<'_, Watcher> {
        self.watcher.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn world(&self) -> &W {
        &self.shared.world
    }

    pub fn config(&self) -> &RecyclerConfig {
        &self.shared.config
    }

    /// Receive every recycle event emitted from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<RecycleEvent> {
        self.shared.events.subscribe()
    }

    /// React to one host event
    pub async fn handle_event(&self, event: HostEvent) -> Result<(), EngineError> {
        match event {
            HostEvent::WorldLoaded => {
                self.register_existing().await?;
            }
            HostEvent::ContainerSpawned { container, kind } => {
                if kind == self.shared.config.input_kind {
                    self.register(container).await?;
                }
            }
            HostEvent::ContainerDestroyed { container } => {
                self.unregister(container);
            }
            HostEvent::ContentsChanged { container } => {
                self.contents_changed(container).await?;
            }
        }
        Ok(())
    }

    /// Register every input container that already exists. Returns how many
    /// were newly registered.
    pub async fn register_existing(&self) -> Result<usize, EngineError> {
        let mut registered = 0;
        for container in self
            .shared
            .world
            .containers_of_kind(self.shared.config.input_kind)
            .await?
        {
            if self.register(container).await? {
                registered += 1;
            }
        }
        tracing::info!(registered, "registered existing recyclers");
        Ok(registered)
    }

    /// Start watching an input container. Items already inside are left alone.
    pub async fn register(&self, container: ContainerId) -> Result<bool, EngineError> {
        if self.watcher().is_tracked(container) {
            return Ok(false);
        }
        let current = match self.shared.world.contents(container).await {
            Ok(current) => current,
            Err(WorldError::ContainerNotFound(_)) => {
                tracing::debug!(%container, "container gone before registration");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.watcher().track(container, current) {
            return Ok(false);
        }
        self.registry.register(container);
        tracing::info!(%container, "recycler registered");
        Ok(true)
    }

    /// Stop watching a container and abandon its pending items
    pub fn unregister(&self, container: ContainerId) -> bool {
        let tracked = self.watcher().forget(container);
        match self.registry.unregister(container) {
            Some(abandoned) => {
                tracing::info!(%container, abandoned, "recycler unregistered");
                true
            }
            None => tracked,
        }
    }

    async fn contents_changed(&self, container: ContainerId) -> Result<(), EngineError> {
        if !self.watcher().is_tracked(container) {
            return Ok(());
        }
        let current = match self.shared.world.contents(container).await {
            Ok(current) => current,
            Err(WorldError::ContainerNotFound(_)) => {
                tracing::debug!(%container, "contents changed on vanished container");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let Some(added) = self.watcher().observe(container, &current) else {
            return Ok(());
        };
        // The snapshot already counts every added handle as seen
        for handle in added {
            if let Err(e) = self.consider(container, handle).await {
                tracing::warn!(%container, %handle, error = %e, "failed to inspect added item");
            }
        }
        Ok(())
    }

    /// Queue a newly added item if it has a recipe
    async fn consider(
        &self,
        container: ContainerId,
        handle: ItemHandle,
    ) -> Result<(), EngineError> {
        let item = match self.shared.world.item_id(handle).await {
            Ok(item) => item,
            Err(WorldError::ItemNotFound(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let Some(recipe) = self.catalog.lookup(item) else {
            tracing::trace!(%container, %handle, %item, "not recyclable");
            return Ok(());
        };

        tracing::debug!(
            %container,
            %handle,
            %item,
            delay_ms = recipe.delay.as_millis() as u64,
            "enqueued"
        );
        self.shared.events.emit(RecycleEvent::Enqueued {
            container,
            handle,
            item,
        });
        let entry = QueueEntry {
            handle,
            item,
            recipe,
            enqueued_at: self.shared.clock.now(),
        };
        if let Some(queue) = self.registry.enqueue(container, entry) {
            self.spawn_worker(queue);
        }
        Ok(())
    }

    fn spawn_worker(&self, queue: Arc<ContainerQueue>) {
        self.shared.active.send_modify(|n| *n += 1);
        let worker = RecyclingWorker::new(Arc::clone(&self.shared), queue);
        tokio::spawn(worker.run());
    }

    /// Number of workers currently running
    pub fn active_workers(&self) -> usize {
        *self.shared.active.borrow()
    }

    /// Pending entries for a container, not counting one being delayed
    pub fn pending(&self, container: ContainerId) -> usize {
        self.registry
            .get(container)
            .map_or(0, |queue| queue.pending_len())
    }

    pub fn is_registered(&self, container: ContainerId) -> bool {
        self.registry.is_registered(container)
    }

    /// Wait until no worker is running
    pub async fn wait_idle(&self) {
        let mut active = self.shared.active.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = active.wait_for(|n| *n == 0).await;
    }

    /// Unregister every container. Running workers stop at their next
    /// suspension point; in-flight delays are not recycled. Returns the number
    /// of abandoned entries.
    pub fn shutdown(&self) -> usize {
        self.watcher().clear();
        let abandoned = self.registry.clear();
        tracing::info!(abandoned, "recycler shut down");
        abandoned
    }
}

#[cfg(test)]
#[path = "recycler_tests.rs"]
mod tests;
