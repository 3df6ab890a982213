// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the recycling engine

use rc_adapters::WorldError;
use thiserror::Error;

/// Errors surfaced while handling host events
///
/// Failures inside a worker never surface here; they are logged and reported
/// as [`crate::RecycleEvent::Skipped`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("world error: {0}")]
    World(#[from] WorldError),
}
