// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-container recycling worker
//!
//! A worker drains one container's queue in FIFO order. For each entry it
//! waits out the recipe delay, checks the item is still there, consumes it
//! and places the outputs. When the queue stays empty for the idle timeout
//! it stops; the next enqueue starts a fresh worker.

use crate::distributor::distribute;
use crate::events::{RecycleEvent, SkipReason, StopReason};
use crate::placement::find_nearest;
use crate::recycler::Shared;
use crate::registry::{ContainerQueue, DrainDecision, QueueEntry};
use rc_adapters::{WorldAdapter, WorldError};
use rc_core::Clock;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Worker state machine
#[derive(Debug)]
pub enum WorkerState {
    /// Looking for the next entry, or waiting for one
    Draining,
    /// Waiting out the recipe delay of an entry
    Delaying(QueueEntry),
    /// Consuming an entry and placing its outputs
    Finalizing(QueueEntry),
    Stopped(StopReason),
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Draining => write!(f, "draining"),
            WorkerState::Delaying(_) => write!(f, "delaying"),
            WorkerState::Finalizing(_) => write!(f, "finalizing"),
            WorkerState::Stopped(_) => write!(f, "stopped"),
        }
    }
}

/// Decrements the active worker count however the worker ends
struct ActiveGuard<'a> {
    active: &'a tokio::sync::watch::Sender<usize>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.active.send_modify(|n| *n = n.saturating_sub(1));
    }
}

pub(crate) struct RecyclingWorker<W, C> {
    shared: Arc<Shared<W, C>>,
    queue: Arc<ContainerQueue>,
}

impl<W: WorldAdapter, C: Clock> RecyclingWorker<W, C> {
    /// The caller has already counted this worker as active
    pub(crate) fn new(shared: Arc<Shared<W, C>>, queue: Arc<ContainerQueue>) -> Self {
        Self { shared, queue }
    }

    pub(crate) async fn run(self) {
        let container = self.queue.container();
        let span = tracing::info_span!("recycler.worker", %container);
        let _active = ActiveGuard {
            active: &self.shared.active,
        };

        async {
            tracing::debug!("worker started");
            self.shared
                .events
                .emit(RecycleEvent::WorkerStarted { container });

            let mut state = WorkerState::Draining;
            let reason = loop {
                state = match state {
                    WorkerState::Stopped(reason) => break reason,
                    state => self.step(state).await,
                };
            };

            tracing::debug!(?reason, "worker stopped");
            self.shared
                .events
                .emit(RecycleEvent::WorkerStopped { container, reason });
        }
        .instrument(span)
        .await
    }

    async fn step(&self, state: WorkerState) -> WorkerState {
        match state {
            WorkerState::Draining => self.drain().await,
            WorkerState::Delaying(entry) => {
                tokio::time::sleep(entry.recipe.delay).await;
                if self.queue.is_closed() {
                    return WorkerState::Stopped(StopReason::Unregistered);
                }
                WorkerState::Finalizing(entry)
            }
            WorkerState::Finalizing(entry) => {
                self.finalize(entry).await;
                WorkerState::Draining
            }
            stopped @ WorkerState::Stopped(_) => stopped,
        }
    }

    async fn drain(&self) -> WorkerState {
        if self.queue.is_closed() {
            return WorkerState::Stopped(StopReason::Unregistered);
        }
        if let Some(entry) = self.queue.pop_front() {
            tracing::trace!(handle = %entry.handle, "delaying");
            return WorkerState::Delaying(entry);
        }

        self.queue
            .wait_for_work(self.shared.config.idle_timeout)
            .await;
        if self.queue.is_closed() {
            return WorkerState::Stopped(StopReason::Unregistered);
        }
        match self.queue.dequeue_or_stop() {
            DrainDecision::Stop => WorkerState::Stopped(StopReason::Idle),
            DrainDecision::Continue => WorkerState::Draining,
        }
    }

    async fn finalize(&self, entry: QueueEntry) {
        let world = &self.shared.world;
        let container = self.queue.container();
        let skip = |reason| RecycleEvent::Skipped {
            container,
            handle: entry.handle,
            item: entry.item,
            reason,
        };

        // Re-validate: a player may have taken the item during the delay
        let present = match world.contents(container).await {
            Ok(contents) => contents.contains(&entry.handle),
            Err(e) => {
                tracing::info!(error = %e, "input container gone, skipping");
                self.shared.events.emit(skip(SkipReason::ContainerGone));
                return;
            }
        };
        if !present {
            tracing::info!(
                handle = %entry.handle,
                "item removed before recycling could occur, skipping"
            );
            self.shared.events.emit(skip(SkipReason::Vanished));
            return;
        }

        let origin = match world.position(container).await {
            Ok(origin) => origin,
            Err(e) => {
                tracing::info!(error = %e, "input container gone, skipping");
                self.shared.events.emit(skip(SkipReason::ContainerGone));
                return;
            }
        };

        match world.remove_item(container, entry.handle).await {
            Ok(()) => {}
            Err(WorldError::ItemNotFound(_)) => {
                tracing::info!(
                handle = %entry.handle,
                "item removed before recycling could occur, skipping"
            );
                self.shared.events.emit(skip(SkipReason::Vanished));
                return;
            }
            Err(e) => {
                tracing::warn!(
                    handle = %entry.handle,
                    error = %e,
                    "could not remove item, skipping"
                );
                self.shared.events.emit(skip(SkipReason::RemovalFailed));
                return;
            }
        }

        let target = match find_nearest(world, origin, self.shared.config.output_kind).await {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(error = %e, "output container lookup failed");
                None
            }
        };
        let report = distribute(
            world,
            &entry.recipe.outputs,
            target.as_ref(),
            self.shared.config.drop_height,
        )
        .await;

        tracing::info!(
            handle = %entry.handle,
            item = %entry.item,
            output = ?target.map(|t| t.container),
            inserted = report.inserted,
            dropped = report.dropped,
            lost = report.lost,
            waited_ms = self.shared.clock.since(entry.enqueued_at).as_millis() as u64,
            "recycled"
        );
        self.shared.events.emit(RecycleEvent::Recycled {
            container,
            handle: entry.handle,
            item: entry.item,
            target: target.map(|t| t.container),
            inserted: report.inserted,
            dropped: report.dropped,
            lost: report.lost,
        });
    }
}
