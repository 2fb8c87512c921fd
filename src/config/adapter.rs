//! Format adapters for application config files.

use super::script;
use crate::context::ToolContext;
use crate::error::{TrellisError, TrellisResult};
use ini::{Ini, ParseOption};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Parser family selected by a config file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Ini,
    Json,
    /// Evaluated script returning a nested mapping
    Script,
    Yaml,
}

/// Extension → adapter, in lookup priority. The first existing file wins.
pub const ADAPTERS: [(&str, AdapterKind); 7] = [
    ("ini", AdapterKind::Ini),
    ("json", AdapterKind::Json),
    ("php", AdapterKind::Script),
    ("php5", AdapterKind::Script),
    ("inc", AdapterKind::Script),
    ("yml", AdapterKind::Yaml),
    ("yaml", AdapterKind::Yaml),
];

impl AdapterKind {
    /// Looks up the adapter registered for a file extension.
    pub fn for_extension(ext: &str) -> Option<Self> {
        ADAPTERS.iter().find(|(e, _)| *e == ext).map(|(_, kind)| *kind)
    }

    /// Parses `path` into the canonical nested mapping.
    ///
    /// # Errors
    /// * `TrellisError::FileSystemError` if the file can't be read
    /// * `TrellisError::ConfigError` if the content is malformed or not a mapping
    pub fn parse(&self, path: &Path, ctx: &ToolContext) -> TrellisResult<Map<String, Value>> {
        let value: Value = match self {
            AdapterKind::Ini => parse_ini(path)?,
            AdapterKind::Json => serde_json::from_str(&fs::read_to_string(path)?)
                .map_err(|e| invalid(path, e))?,
            AdapterKind::Yaml => serde_yaml::from_str(&fs::read_to_string(path)?)
                .map_err(|e| invalid(path, e))?,
            AdapterKind::Script => script::evaluate_file(path, ctx)?,
        };
        into_mapping(value, path)
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterKind::Ini => "ini",
            AdapterKind::Json => "json",
            AdapterKind::Script => "script",
            AdapterKind::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

fn invalid<E: fmt::Display>(path: &Path, e: E) -> TrellisError {
    TrellisError::ConfigError(format!("{}: {}", path.display(), e))
}

fn into_mapping(value: Value, path: &Path) -> TrellisResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(items) => {
            Ok(items.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect())
        }
        other => Err(TrellisError::ConfigError(format!(
            "{} does not contain a mapping (found {})",
            path.display(),
            other
        ))),
    }
}

fn parse_ini(path: &Path) -> TrellisResult<Value> {
    // Backslashes are literal, as in namespaces and Windows paths
    let option = ParseOption { enabled_escape: false, ..ParseOption::default() };
    let ini = Ini::load_from_file_opt(path, option).map_err(|e| match e {
        ini::Error::Io(io) => TrellisError::FileSystemError(io),
        ini::Error::Parse(parse) => invalid(path, parse),
    })?;

    let mut root = Map::new();
    for (section, properties) in ini.iter() {
        let mut target = Map::new();
        for (key, value) in properties.iter() {
            insert_dotted(&mut target, key, cast_ini_value(value));
        }
        match section {
            Some(section) => {
                root.insert(section.to_string(), Value::Object(target));
            }
            None => root.extend(target),
        }
    }
    Ok(Value::Object(root))
}

/// Inserts `value` under a dotted key, creating intermediate mappings.
fn insert_dotted(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map.entry(head.to_string()).or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_dotted(child, rest, value);
            }
        }
    }
}

/// Casts raw INI scalars to booleans, null and numbers.
pub fn cast_ini_value(raw: &str) -> Value {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "on" => return Value::Bool(true),
        "false" | "no" | "off" | "none" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    let looks_numeric = raw.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && raw.chars().any(|c| c.is_ascii_digit());
    if looks_numeric {
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}
