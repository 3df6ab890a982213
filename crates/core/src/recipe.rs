// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recycling recipes and the catalog that maps input items to them

use crate::ids::ItemId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// One line of a recipe's output: `count` units of `item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeOutput {
    pub item: ItemId,
    pub count: u32,
}

impl RecipeOutput {
    pub const fn new(item: ItemId, count: u32) -> Self {
        Self { item, count }
    }
}

/// How one input item is recycled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// The item this recipe consumes
    pub input: ItemId,
    /// How long the item sits in the recycler before it is consumed
    pub delay: Duration,
    /// Produced items, in placement order
    pub outputs: Vec<RecipeOutput>,
}

impl Recipe {
    pub fn new(input: ItemId, delay: Duration, outputs: Vec<RecipeOutput>) -> Self {
        Self {
            input,
            delay,
            outputs,
        }
    }

    /// Total number of units produced by one recycle
    pub fn total_units(&self) -> u64 {
        self.outputs.iter().map(|o| u64::from(o.count)).sum()
    }
}

/// Immutable lookup from input item to recipe
///
/// A missing entry means the item is not recyclable; that is not an error.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: HashMap<ItemId, Arc<Recipe>>,
}

impl Catalog {
    /// Build a catalog. Later recipes for the same input replace earlier ones;
    /// configuration loading rejects duplicates before this point.
    pub fn new(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        Self {
            recipes: recipes
                .into_iter()
                .map(|r| (r.input, Arc::new(r)))
                .collect(),
        }
    }

    pub fn lookup(&self, item: ItemId) -> Option<Arc<Recipe>> {
        self.recipes.get(&item).cloned()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
