// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Recycler configuration: container kinds, engine settings and recipes

mod config;
mod parser;

pub use config::{ContainerKinds, EngineSettings, RecipeConfig};
pub use parser::{load_recipes, parse_recipes, ParseError};
