// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed recycler configuration

use rc_core::{Catalog, ContainerKind, ItemId, Recipe, RecipeOutput};
use std::time::Duration;

/// Default time an empty queue waits before its worker stops
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Default height above the output container at which overflow is dropped
pub const DEFAULT_DROP_HEIGHT: f32 = 2.0;

/// Longest accepted idle timeout (one day)
pub const MAX_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Which container kinds act as recycler input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerKinds {
    pub input: ContainerKind,
    pub output: ContainerKind,
}

/// Tunables for the recycling engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// How long a worker waits on an empty queue before stopping
    pub idle_timeout: Duration,
    /// Vertical offset for world-dropped overflow
    pub drop_height: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            drop_height: DEFAULT_DROP_HEIGHT,
        }
    }
}

/// A fully parsed configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeConfig {
    pub containers: ContainerKinds,
    pub engine: EngineSettings,
    pub recipes: Vec<Recipe>,
}

impl RecipeConfig {
    /// Build the lookup catalog for these recipes
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.recipes.iter().cloned())
    }
}

impl Default for RecipeConfig {
    /// One recycler kind used for both input and output, turning item 121
    /// into five of item 67 after two seconds.
    fn default() -> Self {
        Self {
            containers: ContainerKinds {
                input: ContainerKind(36628),
                output: ContainerKind(36628),
            },
            engine: EngineSettings::default(),
            recipes: vec![Recipe::new(
                ItemId(121),
                Duration::from_millis(2000),
                vec![RecipeOutput::new(ItemId(67), 5)],
            )],
        }
    }
}
