//! Controller source generation used by skeletons with a controller layer.

use crate::error::{TrellisError, TrellisResult};
use crate::generator::write_if_absent;
use crate::validation::NamespaceValidator;
use cruet::Inflector;
use log::info;
use std::path::PathBuf;

/// Everything needed to synthesize one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRequest {
    /// Controller name without the `Controller` suffix, e.g. `index`
    pub name: String,
    /// Project root
    pub directory: PathBuf,
    pub controllers_dir: PathBuf,
    pub base_class: String,
    pub namespace: Option<String>,
}

impl ControllerRequest {
    /// `index` → `IndexController`
    pub fn class_name(&self) -> String {
        format!("{}Controller", self.name.to_pascal_case())
    }
}

/// Writes controller source files.
pub trait ControllerGenerator {
    /// Generates the controller and returns its path.
    fn generate(&self, request: &ControllerRequest) -> TrellisResult<PathBuf>;
}

/// Generates PHP controller classes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpControllerGenerator;

impl PhpControllerGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn source(&self, request: &ControllerRequest) -> String {
        let namespace = match request.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("namespace {};\n\n", ns.trim_start_matches('\\')),
            _ => String::new(),
        };
        format!(
            "<?php\ndeclare(strict_types=1);\n\n{}class {} extends {}\n{{\n\n    public function indexAction()\n    {{\n\n    }}\n\n}}\n",
            namespace,
            request.class_name(),
            request.base_class
        )
    }
}

impl ControllerGenerator for PhpControllerGenerator {
    /// # Errors
    /// * `TrellisError::ValidationError` for a malformed namespace
    /// * `TrellisError::TemplateError` for an empty controller name
    fn generate(&self, request: &ControllerRequest) -> TrellisResult<PathBuf> {
        if request.name.trim().is_empty() {
            return Err(TrellisError::TemplateError("controller name is empty".to_string()));
        }
        if let Some(namespace) = &request.namespace {
            NamespaceValidator::new().validate(namespace)?;
        }

        let path = request.controllers_dir.join(format!("{}.php", request.class_name()));
        if !write_if_absent(&path, &self.source(request))? {
            info!("Controller {} already exists, leaving it untouched", path.display());
        }
        Ok(path)
    }
}
