// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content snapshots for input containers
//!
//! The host only reports that a container's contents changed. The watcher
//! keeps the set of item handles seen last time and turns each notification
//! into the list of handles that are new since then.

use rc_core::{ContainerId, ItemHandle};
use std::collections::{HashMap, HashSet};

/// Handles in `current` that are not in `previous`, in `current` order
pub fn added_items(previous: &HashSet<ItemHandle>, current: &[ItemHandle]) -> Vec<ItemHandle> {
    let mut seen = HashSet::new();
    current
        .iter()
        .copied()
        .filter(|h| !previous.contains(h) && seen.insert(*h))
        .collect()
}

/// Last-seen contents of each tracked container
#[derive(Debug, Default)]
pub struct Watcher {
    snapshots: HashMap<ContainerId, HashSet<ItemHandle>>,
}

impl Watcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a container with its current contents as baseline.
    /// Items already inside are never reported as added. Returns false and
    /// keeps the existing baseline if the container is already tracked.
    pub fn track(
        &mut self,
        container: ContainerId,
        current: impl IntoIterator<Item = ItemHandle>,
    ) -> bool {
        if self.snapshots.contains_key(&container) {
            return false;
        }
        self.snapshots
            .insert(container, current.into_iter().collect());
        true
    }

    pub fn forget(&mut self, container: ContainerId) -> bool {
        self.snapshots.remove(&container).is_some()
    }

    pub fn is_tracked(&self, container: ContainerId) -> bool {
        self.snapshots.contains_key(&container)
    }

    /// Replace the container's snapshot with `current` and return the handles
    /// added since the previous one. `None` if the container is not tracked.
    pub fn observe(
        &mut self,
        container: ContainerId,
        current: &[ItemHandle],
    ) -> Option<Vec<ItemHandle>> {
        let snapshot = self.snapshots.get_mut(&container)?;
        let added = added_items(snapshot, current);
        *snapshot = current.iter().copied().collect();
        Some(added)
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
