//! Demo pipeline: schema, registry, model, render, simulated user input.

use std::fs;

use likeness::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::{DemoError, Result};

/// Schema used when no `--schema` is given.
pub const PEOPLE_SCHEMA: &str = r#"
[types.name]
kind = "scalar"

[types.age]
kind = "scalar"

[types.person]
kind = "struct"
fields = [
    { name = "name", type = "name" },
    { name = "age", type = "age" },
]
actions = ["log", "clear"]

[types.people]
kind = "array"
element = "person"
"#;

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub html: String,
    pub model: Option<Value>,
}

/// Handlers available to schema actions.
///
/// - `log`: logs the struct's JSON snapshot at `info`.
/// - `clear`: resets the struct's scalar fields to null.
#[must_use]
pub fn builtin_actions() -> ActionTable {
    ActionTable::new()
        .with("log", |map| {
            let snapshot = Observable::from(map.clone()).to_json();
            info!(model = %snapshot, "log action");
        })
        .with("clear", |map| {
            for (_, child) in map.iter() {
                if let Some(value) = child.as_value() {
                    value.set_value(Scalar::Null);
                }
            }
        })
}

pub fn run(cli: &Cli) -> Result<Output> {
    let schema = match &cli.schema {
        Some(path) => SchemaConfig::load(path)?,
        None => SchemaConfig::from_toml_str(PEOPLE_SCHEMA)?,
    };
    let registry = schema.builder(&builtin_actions())?.build()?;
    debug!(types = registry.len(), root = %cli.root, "registry ready");

    let model = match &cli.data {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| DemoError::ReadData {
                path: path.clone(),
                source,
            })?;
            let data: Value = serde_json::from_str(&text).map_err(|source| DemoError::ParseData {
                path: path.clone(),
                source,
            })?;
            registry.observable_from_json(&cli.root, &data)?
        }
        None => registry.create_observable(&cli.root)?,
    };

    let root = Node::element("main");
    registry.instantiate(&cli.root, &root, &cli.root, &model)?;

    if let Some(text) = &cli.edit {
        let input = root
            .query_selector("input")
            .ok_or_else(|| DemoError::NoInput {
                root: cli.root.clone(),
            })?;
        input.input(text.as_str());
    }

    if let Some(action) = &cli.click {
        let control = root
            .query_selector_all("button")
            .into_iter()
            .find(|button| button.text_content() == *action)
            .ok_or_else(|| DemoError::NoControl {
                root: cli.root.clone(),
                action: action.clone(),
            })?;
        control.click();
    }

    Ok(Output {
        html: root.inner_html(),
        model: cli.dump_model.then(|| model.to_json()),
    })
}

// ----- Tests -----
