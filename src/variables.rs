//! Placeholder variables driven by boolean options.
//!
//! Each skeleton type may ship a `variables.json` mapping an option name to two
//! replacement sets, `true` and `false`. Resolution picks the set matching the
//! option's truthiness.

use crate::constants::VARIABLES_FILE;
use crate::error::{TrellisError, TrellisResult};
use crate::options::{is_truthy, Options};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Replacement sets for one option.
#[derive(Debug, Default, Deserialize)]
pub struct Branches {
    #[serde(rename = "true", default)]
    pub when_true: IndexMap<String, Value>,
    #[serde(rename = "false", default)]
    pub when_false: IndexMap<String, Value>,
}

/// Declarative `variables.json` document.
pub type VariableSpec = IndexMap<String, Branches>;

/// Resolved placeholder name → literal value.
pub type Variables = IndexMap<String, String>;

/// Location of the variable spec for the configured skeleton type.
pub fn variables_file(options: &Options) -> PathBuf {
    options
        .template_path()
        .join("project")
        .join(options.project_type().as_str())
        .join(VARIABLES_FILE)
}

/// Loads a variable spec.
///
/// # Returns
/// * `TrellisResult<Option<VariableSpec>>` - `None` when the file does not exist
///
/// # Errors
/// * `TrellisError::TemplateError` if the document is not shaped like a variable spec
pub fn load_spec<P: AsRef<Path>>(path: P) -> TrellisResult<Option<VariableSpec>> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No variable spec at {}", path.display());
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let spec = serde_json::from_str(&content)
        .map_err(|e| TrellisError::TemplateError(format!("{}: {}", path.display(), e)))?;
    Ok(Some(spec))
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolves `spec` against `options`.
///
/// Options are walked in the order they were supplied. Every option found in the
/// spec replaces the accumulated set wholesale with its selected branch, so the
/// last matching option decides the result. Sets are never merged.
pub fn resolve(spec: &VariableSpec, options: &Options) -> Variables {
    let mut resolved = Variables::new();
    for (key, value) in options.iter() {
        let Some(branches) = spec.get(key) else {
            continue;
        };
        let selected = if is_truthy(value) { &branches.when_true } else { &branches.when_false };
        resolved = selected.iter().map(|(k, v)| (k.clone(), literal(v))).collect();
    }
    resolved
}

/// Loads the skeleton's variable spec and resolves it.
/// A missing spec resolves to an empty set.
pub fn resolve_for(options: &Options) -> TrellisResult<Variables> {
    let variables = match load_spec(variables_file(options))? {
        Some(spec) => resolve(&spec, options),
        None => Variables::new(),
    };
    debug!("Resolved {} template variables", variables.len());
    Ok(variables)
}
