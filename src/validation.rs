//! Namespace validation for user-supplied strings that end up in generated source.

use crate::error::{TrellisError, TrellisResult};
use regex::Regex;
use std::sync::LazyLock;

/// Default message for a namespace that fails the grammar
pub const DEFAULT_MESSAGE: &str = "Invalid namespace syntax!";

static NAMESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\\?[a-z][a-z0-9_]*(?:\\[a-z][a-z0-9_]*)*$").expect("valid namespace pattern")
});

/// Checks values against the namespace grammar: identifier segments joined by a
/// single backslash, each starting with a letter, with an optional leading backslash.
#[derive(Debug, Clone)]
pub struct NamespaceValidator {
    allow_empty: bool,
    label: String,
    message: String,
}

impl Default for NamespaceValidator {
    fn default() -> Self {
        Self { allow_empty: true, label: "namespace".to_string(), message: DEFAULT_MESSAGE.to_string() }
    }
}

impl NamespaceValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Label substituted for `:field` in the message.
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    pub fn message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = message.into();
        self
    }

    /// Validates `value`.
    ///
    /// # Returns
    /// * `Ok(true)` when the value is empty (and empty values are allowed) or well formed
    ///
    /// # Errors
    /// * `TrellisError::ValidationError` carrying the grammar message followed by one
    ///   diagnostic per offending segment
    pub fn validate(&self, value: &str) -> TrellisResult<bool> {
        if self.allow_empty && value.is_empty() {
            return Ok(true);
        }

        if NAMESPACE_PATTERN.is_match(value) {
            return Ok(true);
        }

        let mut messages = vec![self.message.replace(":field", &self.label)];
        messages.extend(segment_diagnostics(value));
        Err(TrellisError::ValidationError { field: self.label.clone(), messages })
    }
}

fn segment_diagnostics(value: &str) -> Vec<String> {
    let body = value.strip_prefix('\\').unwrap_or(value);
    let mut messages = Vec::new();

    for (i, segment) in body.split('\\').enumerate() {
        match segment.chars().next() {
            None => messages.push(format!("Segment {} is empty", i + 1)),
            Some(c) if !c.is_ascii_alphabetic() => {
                messages.push(format!("Segment '{segment}' must start with a letter"))
            }
            Some(_) => {}
        }
        if let Some(bad) = segment.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            messages.push(format!("Segment '{segment}' contains illegal character '{bad}'"));
        }
    }

    messages
}
