// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe TOML parsing

use crate::config::{ContainerKinds, EngineSettings, RecipeConfig, MAX_IDLE_TIMEOUT};
use rc_core::{ContainerKind, ItemId, Recipe, RecipeOutput};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading recipes
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid duration for {field}: {message}")]
    InvalidDuration { field: String, message: String },
    #[error("duplicate recipe for item {0}")]
    DuplicateRecipe(ItemId),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// `{ item = 67, amount = 5 }`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputDef {
    item: u16,
    amount: u32,
}

/// Read and parse a recipe file
pub fn load_recipes(path: &Path) -> Result<RecipeConfig, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_recipes(&content)
}

/// Parse a recipe configuration from TOML content
pub fn parse_recipes(content: &str) -> Result<RecipeConfig, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let containers = table
        .get("containers")
        .ok_or_else(|| ParseError::MissingField("containers".to_string()))
        .and_then(parse_containers)?;

    let engine = match table.get("engine") {
        Some(value) => parse_engine(value)?,
        None => EngineSettings::default(),
    };

    let mut recipes = Vec::new();
    if let Some(value) = table.get("recipe") {
        let entries = value.as_array().ok_or_else(|| {
            ParseError::InvalidFormat("recipe must be an array of tables".to_string())
        })?;

        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            let recipe = parse_recipe(index, entry)?;
            if !seen.insert(recipe.input) {
                return Err(ParseError::DuplicateRecipe(recipe.input));
            }
            recipes.push(recipe);
        }
    }

    Ok(RecipeConfig {
        containers,
        engine,
        recipes,
    })
}

fn parse_containers(value: &toml::Value) -> Result<ContainerKinds, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("containers must be a table".to_string()))?;

    let kind = |key: &str| -> Result<ContainerKind, ParseError> {
        let field = format!("containers.{}", key);
        let value = table
            .get(key)
            .ok_or_else(|| ParseError::MissingField(field.clone()))?;
        parse_u16(&field, value).map(ContainerKind)
    };

    Ok(ContainerKinds {
        input: kind("input")?,
        output: kind("output")?,
    })
}

fn parse_engine(value: &toml::Value) -> Result<EngineSettings, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("engine must be a table".to_string()))?;

    let mut settings = EngineSettings::default();

    if let Some(v) = table.get("idle_timeout") {
        let idle_timeout = parse_duration("engine.idle_timeout", v)?;
        if idle_timeout > MAX_IDLE_TIMEOUT {
            return Err(ParseError::InvalidDuration {
                field: "engine.idle_timeout".to_string(),
                message: format!(
                    "must be at most {}",
                    humantime::format_duration(MAX_IDLE_TIMEOUT)
                ),
            });
        }
        settings.idle_timeout = idle_timeout;
    }

    if let Some(v) = table.get("drop_height") {
        settings.drop_height = match v {
            toml::Value::Float(f) => *f as f32,
            toml::Value::Integer(i) => *i as f32,
            _ => {
                return Err(ParseError::InvalidFormat(
                    "engine.drop_height must be a number".to_string(),
                ))
            }
        };
    }

    Ok(settings)
}

fn parse_recipe(index: usize, value: &toml::Value) -> Result<Recipe, ParseError> {
    let ctx = format!("recipe[{}]", index);
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("{} must be a table", ctx)))?;

    let input = table
        .get("item")
        .ok_or_else(|| ParseError::MissingField(format!("{}.item", ctx)))
        .and_then(|v| parse_u16(&format!("{}.item", ctx), v))
        .map(ItemId)?;

    // `delay` takes a human duration; `recycle_time` is plain milliseconds
    let delay = match (table.get("delay"), table.get("recycle_time")) {
        (Some(v), None) => parse_duration(&format!("{}.delay", ctx), v)?,
        (None, Some(toml::Value::Integer(ms))) if *ms >= 0 => Duration::from_millis(*ms as u64),
        (None, Some(_)) => {
            return Err(ParseError::InvalidFormat(format!(
                "{}.recycle_time must be a non-negative integer (milliseconds)",
                ctx
            )))
        }
        (Some(_), Some(_)) => {
            return Err(ParseError::InvalidFormat(format!(
                "{}: specify either delay or recycle_time, not both",
                ctx
            )))
        }
        (None, None) => return Err(ParseError::MissingField(format!("{}.delay", ctx))),
    };

    let outputs = match (table.get("outputs"), table.get("recycled_ids")) {
        (Some(v), None) => parse_outputs(&ctx, v)?,
        (None, Some(v)) => parse_recycled_ids(&ctx, v)?,
        (Some(_), Some(_)) => {
            return Err(ParseError::InvalidFormat(format!(
                "{}: specify either outputs or recycled_ids, not both",
                ctx
            )))
        }
        (None, None) => return Err(ParseError::MissingField(format!("{}.outputs", ctx))),
    };

    if outputs.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "{}: recipe must produce at least one item",
            ctx
        )));
    }

    Ok(Recipe::new(input, delay, outputs))
}

fn parse_outputs(ctx: &str, value: &toml::Value) -> Result<Vec<RecipeOutput>, ParseError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ParseError::InvalidFormat(format!("{}.outputs must be an array", ctx)))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let def: OutputDef = entry.clone().try_into().map_err(|e: toml::de::Error| {
                ParseError::InvalidFormat(format!("{}.outputs[{}]: {}", ctx, i, e))
            })?;
            if def.amount == 0 {
                return Err(ParseError::InvalidFormat(format!(
                    "{}.outputs[{}].amount must be at least 1",
                    ctx, i
                )));
            }
            Ok(RecipeOutput::new(ItemId(def.item), def.amount))
        })
        .collect()
}

/// Legacy single-id shape: every listed id is one produced unit.
/// Consecutive repeats collapse into one output line so unit order is kept.
fn parse_recycled_ids(ctx: &str, value: &toml::Value) -> Result<Vec<RecipeOutput>, ParseError> {
    let entries = value.as_array().ok_or_else(|| {
        ParseError::InvalidFormat(format!("{}.recycled_ids must be an array", ctx))
    })?;

    let mut outputs: Vec<RecipeOutput> = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let item = ItemId(parse_u16(&format!("{}.recycled_ids[{}]", ctx, i), entry)?);
        match outputs.last_mut() {
            Some(last) if last.item == item => last.count += 1,
            _ => outputs.push(RecipeOutput::new(item, 1)),
        }
    }
    Ok(outputs)
}

fn parse_u16(field: &str, value: &toml::Value) -> Result<u16, ParseError> {
    value
        .as_integer()
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| {
            ParseError::InvalidFormat(format!("{} must be an integer in 0..=65535", field))
        })
}

fn parse_duration(field: &str, value: &toml::Value) -> Result<Duration, ParseError> {
    match value {
        toml::Value::String(s) => {
            humantime::parse_duration(s).map_err(|e| ParseError::InvalidDuration {
                field: field.to_string(),
                message: e.to_string(),
            })
        }
        toml::Value::Integer(ms) if *ms >= 0 => Ok(Duration::from_millis(*ms as u64)),
        _ => Err(ParseError::InvalidDuration {
            field: field.to_string(),
            message: "expected a duration string like \"2s\" or milliseconds".to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
