//! Application config discovery.
//!
//! Probes a fixed, ordered list of candidate directories for `<basename>.<ext>`
//! using the adapter registry order. The first readable hit wins and nothing is
//! merged. When no candidate matches, the working directory tree is walked for
//! any `config.php` or `config.ini`.

pub mod adapter;
pub mod script;

use crate::constants::{CONFIG_DIRS, FALLBACK_CONFIG_FILES};
use crate::context::ToolContext;
use crate::error::{TrellisError, TrellisResult};
use adapter::{AdapterKind, ADAPTERS};
use log::debug;
use serde_json::{Map, Value};
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A parsed config file exposing its nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    data: Map<String, Value>,
    source: PathBuf,
    adapter: AdapterKind,
}

impl LoadedConfig {
    pub fn new(data: Map<String, Value>, source: PathBuf, adapter: AdapterKind) -> Self {
        Self { data, source, adapter }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.data.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Looks up a nested value by a dotted path such as `database.adapter`.
    pub fn path(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let mut current = self.data.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Reads `database.adapter` and checks it against the registered adapters.
    ///
    /// # Errors
    /// * `TrellisError::UnsupportedAdapterError` if the adapter is not registered
    pub fn database_adapter(&self, ctx: &ToolContext) -> TrellisResult<Option<&str>> {
        match self.path("database.adapter").and_then(Value::as_str) {
            Some(adapter) => {
                ctx.ensure_supported_adapter(adapter)?;
                Ok(Some(adapter))
            }
            None => Ok(None),
        }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// File the config was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn adapter(&self) -> AdapterKind {
        self.adapter
    }
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

/// Locates and parses an application config file.
pub struct ConfigScanner<'a> {
    ctx: &'a ToolContext,
    base_path: PathBuf,
}

impl<'a> ConfigScanner<'a> {
    /// Scanner rooted at the context's working directory.
    pub fn new(ctx: &'a ToolContext) -> Self {
        Self { ctx, base_path: ctx.working_dir().to_path_buf() }
    }

    /// Probes candidate directories under `base_path` instead of the working directory.
    /// The recursive fallback still walks the working directory.
    pub fn with_base_path<P: AsRef<Path>>(mut self, base_path: P) -> Self {
        self.base_path = base_path.as_ref().to_path_buf();
        self
    }

    /// Candidate directories in priority order.
    ///
    /// Empty when the base path is not a readable directory.
    pub fn config_paths(&self) -> Vec<PathBuf> {
        if !self.base_path.is_dir() || self.base_path.read_dir().is_err() {
            return Vec::new();
        }
        CONFIG_DIRS.iter().map(|dir| self.base_path.join(dir)).collect()
    }

    /// Scans for an application config.
    ///
    /// # Arguments
    /// * `basename` - Config name; any extension is stripped (`config.ini` probes `config.*`)
    ///
    /// # Returns
    /// * `TrellisResult<Option<LoadedConfig>>` - The first match, or `None` if nothing was found
    ///
    /// # Notes
    /// The fallback walk returns the first `config.php`/`config.ini` in directory
    /// iteration order, which depends on the file system.
    pub fn scan(&self, basename: &str) -> TrellisResult<Option<LoadedConfig>> {
        let stem = Path::new(basename).file_stem().and_then(|s| s.to_str()).unwrap_or(basename);

        for dir in self.config_paths() {
            for (ext, kind) in ADAPTERS {
                let candidate = dir.join(format!("{stem}.{ext}"));
                debug!("Probing {}", candidate.display());
                if is_readable_file(&candidate) {
                    return self.load_file(candidate, kind).map(Some);
                }
            }
        }

        match self.fallback_scan()? {
            Some((path, kind)) => self.load_file(path, kind).map(Some),
            None => Ok(None),
        }
    }

    /// Same as [`ConfigScanner::scan`] but fails when nothing is found.
    ///
    /// # Errors
    /// * `TrellisError::ConfigNotFound` listing every scanned path
    pub fn load(&self, basename: &str) -> TrellisResult<LoadedConfig> {
        match self.scan(basename)? {
            Some(config) => Ok(config),
            None => {
                let mut scanned = self.config_paths();
                scanned.push(self.ctx.working_dir().to_path_buf());
                Err(TrellisError::ConfigNotFound { scanned })
            }
        }
    }

    fn fallback_scan(&self) -> TrellisResult<Option<(PathBuf, AdapterKind)>> {
        let root = self.ctx.working_dir();
        debug!("No candidate config found, walking {}", root.display());

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| TrellisError::FileSystemError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if FALLBACK_CONFIG_FILES.contains(&name) {
                let kind = entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(AdapterKind::for_extension)
                    .unwrap_or(AdapterKind::Ini);
                return Ok(Some((entry.into_path(), kind)));
            }
        }

        Ok(None)
    }

    fn load_file(&self, path: PathBuf, kind: AdapterKind) -> TrellisResult<LoadedConfig> {
        debug!("Loading {} config from {}", kind, path.display());
        let data = kind.parse(&path, self.ctx)?;
        Ok(LoadedConfig::new(data, path, kind))
    }
}
