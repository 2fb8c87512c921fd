//! Explicit configuration context handed to every component at construction.

use crate::error::{TrellisError, TrellisResult};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Database adapters registered by default
pub const DEFAULT_DB_ADAPTERS: [&str; 3] = ["Mysql", "Postgresql", "Sqlite"];

/// Install paths and host capabilities used by scanners and builders.
///
/// The library never looks these up from the process environment; the binary
/// (or a test) assembles one and passes it down.
#[derive(Debug, Clone)]
pub struct ToolContext {
    working_dir: PathBuf,
    templates_path: PathBuf,
    db_adapters: Vec<String>,
    constants: IndexMap<String, String>,
}

impl ToolContext {
    pub fn new<W: Into<PathBuf>, T: Into<PathBuf>>(working_dir: W, templates_path: T) -> Self {
        Self {
            working_dir: working_dir.into(),
            templates_path: templates_path.into(),
            db_adapters: DEFAULT_DB_ADAPTERS.iter().map(|s| s.to_string()).collect(),
            constants: IndexMap::new(),
        }
    }

    /// Replaces the set of registered database adapters.
    pub fn with_db_adapters<I, S>(mut self, adapters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.db_adapters = adapters.into_iter().map(Into::into).collect();
        self
    }

    /// Predefines a constant visible to script-style config files.
    pub fn with_constant<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    pub fn constants(&self) -> &IndexMap<String, String> {
        &self.constants
    }

    pub fn is_supported_adapter(&self, adapter: &str) -> bool {
        self.db_adapters.iter().any(|a| a == adapter)
    }

    /// Fails with `UnsupportedAdapterError` unless `adapter` is registered.
    pub fn ensure_supported_adapter(&self, adapter: &str) -> TrellisResult<()> {
        if self.is_supported_adapter(adapter) {
            Ok(())
        } else {
            Err(TrellisError::UnsupportedAdapterError(adapter.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_registry() {
        let ctx = ToolContext::new("/work", "/templates");
        assert!(ctx.ensure_supported_adapter("Mysql").is_ok());

        let err = ctx.ensure_supported_adapter("Oracle").unwrap_err();
        assert_eq!(err.to_string(), "Adapter Oracle is not supported");

        let ctx = ctx.with_db_adapters(["Oracle"]);
        assert!(ctx.is_supported_adapter("Oracle"));
        assert!(!ctx.is_supported_adapter("Mysql"));
    }
}
