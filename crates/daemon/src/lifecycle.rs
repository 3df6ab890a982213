// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, command handling, shutdown.

use std::path::PathBuf;
use std::time::Instant;

use rc_adapters::{MemoryWorld, TracedWorldAdapter, WorldSnapshot};
use rc_core::{HostEvent, SystemClock};
use rc_engine::{EngineError, RecycleEvent, Recycler};
use rc_recipes::{load_recipes, RecipeConfig};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::protocol::{decode_command, Applied};

/// Recycler with concrete adapter types (wrapped with tracing)
pub type DaemonRecycler = Recycler<TracedWorldAdapter<MemoryWorld>, SystemClock>;

/// Daemon configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Recipe configuration file; built-in defaults when absent
    pub recipes_path: Option<PathBuf>,
    /// Log file; stderr when absent
    pub log_path: Option<PathBuf>,
}

/// Daemon state during operation
pub struct DaemonState {
    /// Simulated host world, mutated by stdin commands
    pub world: MemoryWorld,
    pub recycler: DaemonRecycler,
    /// Host events emitted by the world
    pub host_events: mpsc::UnboundedReceiver<HostEvent>,
    /// Events emitted by the recycler
    pub recycle_events: mpsc::UnboundedReceiver<RecycleEvent>,
    /// When daemon started
    pub start_time: Instant,
}

/// Load configuration and wire the world to the recycler
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    let recipes = match &config.recipes_path {
        Some(path) => load_recipes(path)?,
        None => RecipeConfig::default(),
    };
    info!(
        recipes = recipes.recipes.len(),
        input = %recipes.containers.input,
        output = %recipes.containers.output,
        "configuration loaded"
    );

    let world = MemoryWorld::new();
    let host_events = world.subscribe();
    let recycler = Recycler::from_config(
        TracedWorldAdapter::new(world.clone()),
        &recipes,
        SystemClock,
    );
    let recycle_events = recycler.subscribe();

    Ok(DaemonState {
        world,
        recycler,
        host_events,
        recycle_events,
        start_time: Instant::now(),
    })
}

impl DaemonState {
    /// Deliver a host event to the recycler
    pub async fn process_event(&self, event: HostEvent) -> Result<(), LifecycleError> {
        self.recycler.handle_event(event).await?;
        Ok(())
    }

    /// Deliver every host event emitted so far. Returns how many there were.
    pub async fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.host_events.try_recv() {
            if let Err(e) = self.process_event(event).await {
                warn!("Error processing host event: {}", e);
            }
            processed += 1;
        }
        processed
    }

    /// Apply one stdin line. Malformed or rejected commands are logged and
    /// skipped.
    pub fn apply_line(&self, line: &str) -> Applied {
        let line = line.trim();
        if line.is_empty() {
            return Applied::Done;
        }
        match decode_command(line).and_then(|command| command.apply(&self.world)) {
            Ok(applied) => applied,
            Err(e) => {
                warn!(line, "skipping command: {}", e);
                Applied::Done
            }
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Stop every worker without waiting for in-flight delays
    pub fn shutdown(&self) {
        info!("Shutting down daemon...");
        let abandoned = self.recycler.shutdown();
        info!(
            abandoned,
            uptime_ms = self.start_time.elapsed().as_millis() as u64,
            "Daemon shutdown complete"
        );
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid log path: {0}")]
    InvalidLogPath(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Recipe config error: {0}")]
    Recipes(#[from] rc_recipes::ParseError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
