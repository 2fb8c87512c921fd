//! Common constants used throughout trellis.

/// Directories searched for an application config file, highest priority first
pub const CONFIG_DIRS: [&str; 4] = ["app/config", "config", "apps/config", "apps/frontend/config"];

/// File names accepted by the recursive fallback scan
pub const FALLBACK_CONFIG_FILES: [&str; 2] = ["config.php", "config.ini"];

/// Sentinel directory marking an initialized project root
pub const MARKER_DIR: &str = ".trellis";

/// Per-skeleton variable specification file name
pub const VARIABLES_FILE: &str = "variables.json";

/// Opening and closing delimiter of a `@@key@@` placeholder
pub const PLACEHOLDER_DELIMITER: &str = "@@";

/// Namespace token used when the naming context is `default`
pub const DEFAULT_NAMESPACE: &str = "MyDefault";

/// Environment variable the binary reads the templates root from
pub const TEMPLATES_ENV: &str = "TRELLIS_TEMPLATES";
