//! Project root handling: separator normalization, absolute path tests and
//! marker directory detection.

use crate::constants::MARKER_DIR;
use crate::context::ToolContext;
use regex::Regex;
use std::path::{Path, MAIN_SEPARATOR};
use std::sync::LazyLock;

static DRIVE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]:\\").expect("valid drive letter pattern"));

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Keeps a project root that always ends with the host separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root_path: String,
}

impl PathResolver {
    /// Creates a resolver rooted at `root`.
    pub fn new<S: AsRef<str>>(root: S) -> Self {
        let mut resolver = Self { root_path: String::new() };
        resolver.set_root_path(root);
        resolver
    }

    /// Creates a resolver rooted at the context's working directory.
    pub fn from_context(ctx: &ToolContext) -> Self {
        Self::new(ctx.working_dir().to_string_lossy())
    }

    /// Normalizes separators for the host platform and guarantees a trailing one.
    ///
    /// An empty path collapses to a lone separator.
    pub fn set_root_path<S: AsRef<str>>(&mut self, path: S) -> &mut Self {
        let normalized = path.as_ref().replace('/', &MAIN_SEPARATOR.to_string());
        self.root_path = format!("{}{}", normalized.trim_end_matches(is_separator), MAIN_SEPARATOR);
        self
    }

    /// Returns the root, or the root joined with a trimmed `subpath` plus a trailing separator.
    pub fn get_root_path(&self, subpath: Option<&str>) -> String {
        match subpath.map(|p| p.trim_matches(is_separator)) {
            Some(sub) if !sub.is_empty() => format!("{}{}{}", self.root_path, sub, MAIN_SEPARATOR),
            _ => self.root_path.clone(),
        }
    }

    /// Moves the root one or more levels deeper.
    pub fn append_root_path<S: AsRef<str>>(&mut self, subpath: S) -> &mut Self {
        let appended = format!(
            "{}{}",
            self.get_root_path(None),
            subpath.as_ref().trim_end_matches(is_separator)
        );
        self.set_root_path(appended)
    }

    /// Checks whether `path` is absolute for the host platform.
    pub fn is_absolute_path(&self, path: &str) -> bool {
        if cfg!(windows) {
            is_drive_letter_path(path)
        } else {
            path.starts_with(MAIN_SEPARATOR)
        }
    }

    /// Whether the marker directory exists under the root.
    pub fn has_marker_directory(&self) -> bool {
        Path::new(&self.root_path).join(MARKER_DIR).exists()
    }
}

/// `C:\`-style prefix check used on Windows hosts.
pub fn is_drive_letter_path(path: &str) -> bool {
    DRIVE_LETTER.is_match(path)
}
