//! Integration catalog loading and record accessors.
//!
//! Records stay ordered YAML mappings so keys the enricher does not touch,
//! and the order of every key, survive the round trip to the output file.
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

pub const DEFAULT_INTEGRATION_NAME: &str = "Unknown Integration";
pub const DEFAULT_TOOL_NAME: &str = "Unknown Tool";

pub const NAME_KEY: &str = "name";
pub const DESCRIPTION_KEY: &str = "description";
pub const TOOLS_KEY: &str = "tools";
pub const ARG_SCHEMA_KEY: &str = "arg_schema";
/// Misspelling found in legacy catalogs; migrated to `arg_schema` on read.
pub const LEGACY_ARG_SCHEMA_KEY: &str = "arg_schena";

/// Ordered sequence of integration records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    integrations: Vec<Mapping>,
}

/// One entry of a tool's argument schema, as used in prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub description: String,
}

impl Catalog {
    /// Validate the document shape: a sequence whose entries are mappings.
    pub fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Sequence(items) => items,
            Value::Null => return Err(anyhow!("catalog is empty; expected a sequence")),
            other => {
                return Err(anyhow!(
                    "catalog root must be a sequence of integrations (got {})",
                    value_kind(&other)
                ))
            }
        };
        let integrations = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Mapping(mapping) => Ok(mapping),
                other => Err(anyhow!(
                    "integration #{} must be a mapping (got {})",
                    idx + 1,
                    value_kind(&other)
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { integrations })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(text).context("parse catalog YAML")?;
        value
            .apply_merge()
            .context("resolve merge keys in catalog YAML")?;
        Self::from_value(value)
    }

    pub fn integrations(&self) -> &[Mapping] {
        &self.integrations
    }

    pub fn integrations_mut(&mut self) -> &mut [Mapping] {
        &mut self.integrations
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("serialize catalog YAML")
    }
}

/// Load a catalog, failing before any parsing when the file is absent.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(anyhow!("YAML file not found: {}", path.display()));
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Catalog::from_yaml_str(&text).with_context(|| format!("load catalog {}", path.display()))
}

/// Read a record's `name`, falling back to `default` when absent or null.
pub fn record_name(record: &Mapping, default: &str) -> Result<String> {
    match record.get(NAME_KEY) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        Some(other) => Err(anyhow!(
            "`{NAME_KEY}` must be a scalar (got {})",
            value_kind(other)
        )),
    }
}

/// Insert or overwrite the record's `description`.
///
/// A new key lands after the existing ones; an existing key keeps its slot.
pub fn set_description(record: &mut Mapping, text: String) {
    record.insert(Value::from(DESCRIPTION_KEY), Value::String(text));
}

/// Borrow an integration's tool list; `None` when the key is absent or null.
pub fn tools_mut(integration: &mut Mapping) -> Result<Option<&mut Vec<Value>>> {
    match integration.get_mut(TOOLS_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(tools)) => Ok(Some(tools)),
        Some(other) => Err(anyhow!(
            "`{TOOLS_KEY}` must be a sequence (got {})",
            value_kind(other)
        )),
    }
}

/// Read a tool's argument schema, preferring the legacy key when present.
pub fn tool_arguments(tool: &Mapping) -> Result<Vec<Argument>> {
    let (key, value) = match tool.get(LEGACY_ARG_SCHEMA_KEY) {
        Some(value) => (LEGACY_ARG_SCHEMA_KEY, value),
        None => match tool.get(ARG_SCHEMA_KEY) {
            Some(value) => (ARG_SCHEMA_KEY, value),
            None => return Ok(Vec::new()),
        },
    };
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => {
            return Err(anyhow!(
                "`{key}` must be a sequence (got {})",
                value_kind(other)
            ))
        }
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            Argument::from_value(item).with_context(|| format!("`{key}` entry #{}", idx + 1))
        })
        .collect()
}

/// Move `arg_schena` to `arg_schema`. Returns whether a rename happened.
///
/// When both keys exist the legacy value replaces the current one in place.
pub fn migrate_arg_schema(tool: &mut Mapping) -> bool {
    match tool.shift_remove(LEGACY_ARG_SCHEMA_KEY) {
        Some(value) => {
            tool.insert(Value::from(ARG_SCHEMA_KEY), value);
            true
        }
        None => false,
    }
}

impl Argument {
    pub fn from_value(value: &Value) -> Result<Self> {
        let mapping = value
            .as_mapping()
            .ok_or_else(|| anyhow!("argument must be a mapping (got {})", value_kind(value)))?;
        Ok(Self {
            name: required_string(mapping, NAME_KEY)?,
            description: required_string(mapping, DESCRIPTION_KEY)?,
        })
    }
}

/// Render arguments as `name (description)` joined with `, `.
pub fn render_arguments(args: &[Argument]) -> String {
    args.iter()
        .map(|arg| format!("{} ({})", arg.name, arg.description))
        .collect::<Vec<_>>()
        .join(", ")
}

fn required_string(mapping: &Mapping, key: &str) -> Result<String> {
    match mapping.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        _ => Err(anyhow!("argument missing string field `{key}`")),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
