// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observable recycler events

use rc_core::{ContainerId, ItemHandle, ItemId};
use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Why a queued item was not recycled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The item left the container before its delay elapsed
    Vanished,
    /// The host refused to remove the item
    RemovalFailed,
    /// The input container no longer exists
    ContainerGone,
}

/// Why a worker stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The queue stayed empty for the idle timeout
    Idle,
    /// The container was unregistered
    Unregistered,
}

/// Something the recycler did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecycleEvent {
    Enqueued {
        container: ContainerId,
        handle: ItemHandle,
        item: ItemId,
    },
    WorkerStarted {
        container: ContainerId,
    },
    WorkerStopped {
        container: ContainerId,
        reason: StopReason,
    },
    Recycled {
        container: ContainerId,
        handle: ItemHandle,
        item: ItemId,
        target: Option<ContainerId>,
        inserted: u32,
        dropped: u32,
        lost: u32,
    },
    Skipped {
        container: ContainerId,
        handle: ItemHandle,
        item: ItemId,
        reason: SkipReason,
    },
}

impl RecycleEvent {
    pub fn container(&self) -> ContainerId {
        match self {
            RecycleEvent::Enqueued { container, .. }
            | RecycleEvent::WorkerStarted { container }
            | RecycleEvent::WorkerStopped { container, .. }
            | RecycleEvent::Recycled { container, .. }
            | RecycleEvent::Skipped { container, .. } => *container,
        }
    }
}

/// Fan-out of recycle events to subscribers
#[derive(Default)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<RecycleEvent>>>,
}

impl EventBus {
    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<RecycleEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    pub(crate) fn emit(&self, event: RecycleEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
