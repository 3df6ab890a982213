// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use rc_core::ContainerKind;
use rc_recipes::RecipeConfig;
use std::time::Duration;

/// Settings the recycler needs at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecyclerConfig {
    /// Containers of this kind are watched and recycled from
    pub input_kind: ContainerKind,
    /// Outputs go to the nearest container of this kind
    pub output_kind: ContainerKind,
    /// How long a worker waits on an empty queue before stopping
    pub idle_timeout: Duration,
    /// Height above the output container for world-dropped overflow
    pub drop_height: f32,
}

impl From<&RecipeConfig> for RecyclerConfig {
    fn from(config: &RecipeConfig) -> Self {
        Self {
            input_kind: config.containers.input,
            output_kind: config.containers.output,
            idle_timeout: config.engine.idle_timeout,
            drop_height: config.engine.drop_height,
        }
    }
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self::from(&RecipeConfig::default())
    }
}
