//! Seed file generation with `@@key@@` placeholder substitution.
//!
//! Generation never overwrites: an existing destination is left untouched.

use crate::constants::{DEFAULT_NAMESPACE, PLACEHOLDER_DELIMITER};
use crate::error::TrellisResult;
use crate::variables::Variables;
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Namespace token derived from a naming context.
///
/// The first character is upper-cased; `default` (any case, surrounding
/// whitespace ignored) maps to `MyDefault`.
pub fn namespace_token(name: &str) -> String {
    if name.trim().to_lowercase() == "default" {
        return DEFAULT_NAMESPACE.to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn placeholder(key: &str) -> String {
    format!("{PLACEHOLDER_DELIMITER}{key}{PLACEHOLDER_DELIMITER}")
}

/// Applies the naming context and the resolved variables to template text.
///
/// `@@name@@` and `@@namespace@@` are replaced first, then every variable in
/// the set. Variable keys are expected to be disjoint; overlapping keys give
/// order-dependent output.
pub fn render(template: &str, name: Option<&str>, variables: &Variables) -> String {
    let mut out = template.to_string();
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        out = out.replace(&placeholder("name"), name);
        out = out.replace(&placeholder("namespace"), &namespace_token(name));
    }
    for (key, value) in variables {
        out = out.replace(&placeholder(key), value);
    }
    out
}

/// Writes `content` to `dest` only if it does not exist yet.
///
/// # Returns
/// * `TrellisResult<bool>` - Whether the file was written
pub fn write_if_absent<P: AsRef<Path>>(dest: P, content: &str) -> TrellisResult<bool> {
    let dest = dest.as_ref();
    match OpenOptions::new().write(true).create_new(true).open(dest) {
        Ok(mut file) => {
            file.write_all(content.as_bytes())?;
            debug!("Created {}", dest.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Skipping existing {}", dest.display());
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Generates `dest` from the template at `source`.
///
/// # Arguments
/// * `source` - Template file
/// * `dest` - File to create
/// * `name` - Optional naming context for `@@name@@`/`@@namespace@@`
/// * `variables` - Resolved placeholder values
///
/// # Returns
/// * `TrellisResult<bool>` - `false` when `dest` already existed and nothing was done
///
/// # Errors
/// * `TrellisError::FileSystemError` if the template can't be read or `dest` can't be written
pub fn generate_file<S: AsRef<Path>, D: AsRef<Path>>(
    source: S,
    dest: D,
    name: Option<&str>,
    variables: &Variables,
) -> TrellisResult<bool> {
    let dest = dest.as_ref();
    if dest.exists() {
        debug!("Skipping existing {}", dest.display());
        return Ok(false);
    }
    let template = fs::read_to_string(source.as_ref())?;
    write_if_absent(dest, &render(&template, name, variables))
}

/// Copies `source` to `dest` verbatim unless `dest` exists.
pub fn copy_if_absent<S: AsRef<Path>, D: AsRef<Path>>(source: S, dest: D) -> TrellisResult<bool> {
    let dest = dest.as_ref();
    if dest.exists() {
        debug!("Skipping existing {}", dest.display());
        return Ok(false);
    }
    let content = fs::read_to_string(source.as_ref())?;
    write_if_absent(dest, &content)
}
