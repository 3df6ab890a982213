// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-container recycling queues
//!
//! Each registered input container owns a FIFO of pending items and a
//! `worker_active` flag. The flag is only flipped under the queue's lock:
//! [`QueueRegistry::enqueue`] sets it and tells the caller to start a worker,
//! [`ContainerQueue::dequeue_or_stop`] clears it when the worker gives up.
//! Together they guarantee at most one worker per container and that an item
//! enqueued while a worker is deciding to stop is never stranded.

use rc_core::{ContainerId, ItemHandle, ItemId, Recipe};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// A recyclable item waiting in a container's queue
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub handle: ItemHandle,
    pub item: ItemId,
    pub recipe: Arc<Recipe>,
    pub enqueued_at: Instant,
}

/// Outcome of a worker finding its queue empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainDecision {
    /// Still empty; the worker flag is cleared and the worker must stop
    Stop,
    /// An item arrived in the meantime; keep draining
    Continue,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<QueueEntry>,
    worker_active: bool,
}

/// Queue and worker flag for one input container
pub struct ContainerQueue {
    container: ContainerId,
    state: Mutex<QueueState>,
    wake: Notify,
    closed: AtomicBool,
}

impl ContainerQueue {
    fn new(container: ContainerId) -> Self {
        Self {
            container,
            state: Mutex::new(QueueState::default()),
            wake: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Append an entry. Returns true if no worker was active, in which case
    /// the flag is now set and the caller must start one.
    fn push(&self, entry: QueueEntry) -> bool {
        let start = {
            let mut state = self.lock();
            state.pending.push_back(entry);
            !std::mem::replace(&mut state.worker_active, true)
        };
        self.wake.notify_one();
        start
    }

    /// Take the oldest pending entry
    pub fn pop_front(&self) -> Option<QueueEntry> {
        self.lock().pending.pop_front()
    }

    /// Called by the worker after its idle wait. Clears `worker_active` only
    /// if the queue is still empty, atomically with the check.
    pub fn dequeue_or_stop(&self) -> DrainDecision {
        let mut state = self.lock();
        if state.pending.is_empty() {
            state.worker_active = false;
            DrainDecision::Stop
        } else {
            DrainDecision::Continue
        }
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_worker_active(&self) -> bool {
        self.lock().worker_active
    }

    /// True once the container has been unregistered
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait until an entry is pending, the queue is closed, or `idle` elapses
    pub async fn wait_for_work(&self, idle: Duration) {
        // An idle timeout past the clock's range never elapses
        let deadline = tokio::time::Instant::now().checked_add(idle);
        loop {
            if self.is_closed() || self.pending_len() > 0 {
                return;
            }
            // A notify from an entry already consumed leaves a stale permit;
            // the loop re-checks instead of trusting the wakeup.
            match deadline {
                Some(deadline) => {
                    if tokio::time::timeout_at(deadline, self.wake.notified())
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                None => self.wake.notified().await,
            }
        }
    }

    fn close(&self) -> usize {
        self.closed.store(true, Ordering::Release);
        let abandoned = {
            let mut state = self.lock();
            let n = state.pending.len();
            state.pending.clear();
            n
        };
        self.wake.notify_one();
        abandoned
    }
}

/// All registered input containers
#[derive(Default)]
pub struct QueueRegistry {
    queues: Mutex<HashMap<ContainerId, Arc<ContainerQueue>>>,
}

impl QueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContainerId, Arc<ContainerQueue>>> {
        self.queues.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create empty state for a container. Returns false if already registered.
    pub fn register(&self, container: ContainerId) -> bool {
        let mut queues = self.lock();
        if queues.contains_key(&container) {
            return false;
        }
        queues.insert(container, Arc::new(ContainerQueue::new(container)));
        true
    }

    /// Discard a container's state. A running worker notices the closed queue
    /// at its next suspension point and stops. Returns the number of pending
    /// entries abandoned, or `None` if the container was not registered.
    pub fn unregister(&self, container: ContainerId) -> Option<usize> {
        let queue = self.lock().remove(&container)?;
        Some(queue.close())
    }

    pub fn is_registered(&self, container: ContainerId) -> bool {
        self.lock().contains_key(&container)
    }

    pub fn get(&self, container: ContainerId) -> Option<Arc<ContainerQueue>> {
        self.lock().get(&container).cloned()
    }

    /// Append an entry to a container's queue, creating the queue if needed.
    ///
    /// Returns the queue when the caller must start a worker for it. Exactly
    /// one of any set of concurrent callers observes this.
    pub fn enqueue(
        &self,
        container: ContainerId,
        entry: QueueEntry,
    ) -> Option<Arc<ContainerQueue>> {
        let queue = Arc::clone(
            self.lock()
                .entry(container)
                .or_insert_with(|| Arc::new(ContainerQueue::new(container))),
        );
        queue.push(entry).then_some(queue)
    }

    /// Registered containers, in no particular order
    pub fn containers(&self) -> Vec<ContainerId> {
        self.lock().keys().copied().collect()
    }

    /// Unregister everything. Returns the number of abandoned entries.
    pub fn clear(&self) -> usize {
        let queues: Vec<_> = self.lock().drain().map(|(_, q)| q).collect();
        queues.iter().map(|q| q.close()).sum()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
