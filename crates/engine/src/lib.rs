// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Item recycler engine
//!
//! Watches input containers for recyclable items, queues them per container,
//! and runs one worker per busy container that waits out each recipe's delay,
//! consumes the item and places the outputs in the nearest output container.

mod config;
mod distributor;
mod error;
mod events;
mod placement;
mod recycler;
mod registry;
mod watcher;
mod worker;

pub use config::RecyclerConfig;
pub use distributor::{distribute, Distribution};
pub use error::EngineError;
pub use events::{RecycleEvent, SkipReason, StopReason};
pub use placement::{find_nearest, nearest, Target};
pub use recycler::Recycler;
pub use registry::{ContainerQueue, DrainDecision, QueueEntry, QueueRegistry};
pub use watcher::{added_items, Watcher};
pub use worker::WorkerState;
