// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rc-core: shared vocabulary for the item recycler
//!
//! This crate provides:
//! - Host identifiers (items, containers, handles)
//! - World-space geometry
//! - Recipes and the recipe catalog
//! - Host event types
//! - Clock abstraction for testable timestamps

pub mod clock;
pub mod event;
pub mod geometry;
pub mod ids;
pub mod recipe;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::HostEvent;
pub use geometry::Point;
pub use ids::{ContainerId, ContainerKind, ItemHandle, ItemId};
pub use recipe::{Catalog, Recipe, RecipeOutput};
