//! Builder options.
//!
//! Options arrive as loosely typed key/value pairs and are dispatched through a
//! fixed table of typed setters. Once built, `Options` is read-only. Defaulted
//! keys come first in schema order, followed by required keys as supplied.

use crate::context::ToolContext;
use crate::error::{TrellisError, TrellisResult};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Skeleton type of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectType {
    Micro,
    #[default]
    Simple,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Micro => "micro",
            ProjectType::Simple => "simple",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = TrellisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "micro" => Ok(ProjectType::Micro),
            "simple" => Ok(ProjectType::Simple),
            other => Err(TrellisError::OptionError(format!("unknown project type '{other}'"))),
        }
    }
}

/// View rendering engine for the default view files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateEngine {
    #[default]
    Phtml,
    Volt,
}

impl TemplateEngine {
    /// Anything other than `volt` falls back to `phtml`.
    pub fn from_name(name: &str) -> Self {
        if name == "volt" {
            TemplateEngine::Volt
        } else {
            TemplateEngine::Phtml
        }
    }

    /// File extension of view templates for this engine.
    pub fn extension(&self) -> &'static str {
        match self {
            TemplateEngine::Phtml => "phtml",
            TemplateEngine::Volt => "volt",
        }
    }
}

type Setter = fn(&mut Options, &Value) -> TrellisResult<()>;

/// Recognized option keys and their typed setters.
const OPTION_SCHEMA: [(&str, Setter); 7] = [
    ("projectPath", set_project_path),
    ("templatePath", set_template_path),
    ("name", set_name),
    ("type", set_project_type),
    ("useConfigIni", set_use_config_ini),
    ("templateEngine", set_template_engine),
    ("enableWebTools", set_enable_web_tools),
];

fn expect_str<'a>(key: &str, value: &'a Value) -> TrellisResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| TrellisError::OptionError(format!("'{key}' expects a string, got {value}")))
}

fn expect_bool(key: &str, value: &Value) -> TrellisResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| TrellisError::OptionError(format!("'{key}' expects a boolean, got {value}")))
}

fn set_project_path(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.project_path = PathBuf::from(expect_str("projectPath", value)?);
    Ok(())
}

fn set_template_path(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.template_path = PathBuf::from(expect_str("templatePath", value)?);
    Ok(())
}

fn set_name(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.name = expect_str("name", value)?.to_string();
    Ok(())
}

fn set_project_type(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.project_type = expect_str("type", value)?.parse()?;
    Ok(())
}

fn set_use_config_ini(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.use_config_ini = expect_bool("useConfigIni", value)?;
    Ok(())
}

fn set_template_engine(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.template_engine = TemplateEngine::from_name(expect_str("templateEngine", value)?);
    Ok(())
}

fn set_enable_web_tools(options: &mut Options, value: &Value) -> TrellisResult<()> {
    options.enable_web_tools = expect_bool("enableWebTools", value)?;
    Ok(())
}

/// Truthiness of a raw option value: empty strings, `"0"`, zero, `false`,
/// `null` and empty collections are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Validated, immutable builder options.
#[derive(Debug, Clone)]
pub struct Options {
    project_path: PathBuf,
    template_path: PathBuf,
    name: String,
    project_type: ProjectType,
    use_config_ini: bool,
    template_engine: TemplateEngine,
    enable_web_tools: bool,
    entries: IndexMap<&'static str, Value>,
}

impl Options {
    pub fn builder(ctx: &ToolContext) -> OptionsBuilder {
        OptionsBuilder::new(ctx)
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn use_config_ini(&self) -> bool {
        self.use_config_ini
    }

    pub fn template_engine(&self) -> TemplateEngine {
        self.template_engine
    }

    pub fn enable_web_tools(&self) -> bool {
        self.enable_web_tools
    }

    /// Whether `key` has a value, either supplied or defaulted.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys and their raw values: defaults in schema order, then required keys
    /// in the order they were first set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

/// Collects raw key/value pairs and validates them against the option schema.
#[derive(Debug)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Starts from the defaults. Every defaulted key is already present in
    /// schema order, so a later `set` only replaces its value.
    pub fn new(ctx: &ToolContext) -> Self {
        let defaults = [
            ("templatePath", Value::from(ctx.templates_path().to_string_lossy().into_owned())),
            ("type", Value::from(ProjectType::default().as_str())),
            ("useConfigIni", Value::from(false)),
            ("templateEngine", Value::from(TemplateEngine::default().extension())),
            ("enableWebTools", Value::from(false)),
        ];
        Self {
            options: Options {
                project_path: PathBuf::new(),
                template_path: ctx.templates_path().to_path_buf(),
                name: String::new(),
                project_type: ProjectType::default(),
                use_config_ini: false,
                template_engine: TemplateEngine::default(),
                enable_web_tools: false,
                entries: defaults.into_iter().collect(),
            },
        }
    }

    /// Sets a single option.
    ///
    /// # Errors
    /// * `TrellisError::OptionError` if the key is unknown or the value has the wrong type
    pub fn set<V: Into<Value>>(mut self, key: &str, value: V) -> TrellisResult<Self> {
        let value = value.into();
        let (key, setter) = OPTION_SCHEMA
            .iter()
            .find(|(name, _)| *name == key)
            .ok_or_else(|| TrellisError::OptionError(format!("unknown option '{key}'")))?;
        setter(&mut self.options, &value)?;
        // Re-setting a key keeps its original position
        self.options.entries.insert(*key, value);
        Ok(self)
    }

    /// Sets every pair of `values` in iteration order.
    pub fn extend<I, K, V>(mut self, values: I) -> TrellisResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in values {
            self = self.set(key.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Finishes the options.
    ///
    /// # Errors
    /// * `TrellisError::OptionError` if `projectPath` or `name` is missing
    pub fn build(self) -> TrellisResult<Options> {
        for required in ["projectPath", "name"] {
            if !self.options.has(required) {
                return Err(TrellisError::OptionError(format!("'{required}' is required")));
            }
        }
        Ok(self.options)
    }
}
