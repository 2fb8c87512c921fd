//! Project skeleton builders.
//!
//! A build runs a fixed pipeline: directories, variables, config files,
//! bootstrap, rewrite/router files, views and, for skeletons with a controller
//! layer, controller generation. A failing step aborts the rest; whatever the
//! earlier steps produced stays on disk.

pub mod controller;
pub mod micro;
pub mod simple;

use crate::error::TrellisResult;
use crate::generator::{copy_if_absent, generate_file, write_if_absent};
use crate::options::{Options, ProjectType};
use crate::variables::{self, Variables};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub use controller::{ControllerGenerator, ControllerRequest, PhpControllerGenerator};
pub use micro::MicroBuilder;
pub use simple::SimpleBuilder;

/// Root rewrite rules forwarding every request to `public/`
pub const ROOT_HTACCESS: &str = "<IfModule mod_rewrite.c>\n\tRewriteEngine on\n\tRewriteRule  ^$ public/    [L]\n\tRewriteRule  (.*) public/$1 [L]\n</IfModule>";

/// Page served when the web server ignores the rewrite rules
pub const REWRITE_DISABLED_PAGE: &str = "<html lang=\"en\"><body><h1>Mod-Rewrite is not enabled</h1><p>Please enable rewrite module on your web server to continue</body></html>";

/// Builds one kind of project skeleton.
pub trait ProjectBuilder {
    /// Relative directories created before any file is written.
    fn directories(&self) -> &'static [&'static str];

    /// Runs the whole pipeline.
    ///
    /// # Errors
    /// * `TrellisError::FileSystemError` from any step, unchanged; earlier artifacts are kept
    fn build(&mut self) -> TrellisResult<bool>;
}

/// Installs developer web tools into a freshly built project.
pub trait WebToolsInstaller {
    fn install(&self, project_path: &Path) -> TrellisResult<()>;
}

/// Returns the builder matching the configured skeleton type.
pub fn builder_for(options: &Options) -> Box<dyn ProjectBuilder + '_> {
    match options.project_type() {
        ProjectType::Micro => Box::new(MicroBuilder::new(options)),
        ProjectType::Simple => Box::new(SimpleBuilder::new(options)),
    }
}

/// Steps shared by every skeleton type.
pub struct Scaffold<'a> {
    options: &'a Options,
    variables: Variables,
}

impl<'a> Scaffold<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { options, variables: Variables::new() }
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// Variables resolved for the build in progress.
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Template file for the configured skeleton type.
    pub fn template<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.options
            .template_path()
            .join("project")
            .join(self.options.project_type().as_str())
            .join(relative)
    }

    /// Path inside the project being built.
    pub fn target<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.options.project_path().join(relative)
    }

    /// Creates every directory; existing directories are fine, anything else in
    /// the way is an error.
    pub fn build_directories(&self, directories: &[&str]) -> TrellisResult<()> {
        for dir in directories {
            let path = self.target(dir);
            fs::create_dir_all(&path)?;
            debug!("Directory ready: {}", path.display());
        }
        Ok(())
    }

    /// Loads and caches the variable set for this build.
    pub fn resolve_variables(&mut self) -> TrellisResult<()> {
        self.variables = variables::resolve_for(self.options)?;
        Ok(())
    }

    /// Drops the cached variables once a build is over.
    pub fn finish(&mut self) {
        self.variables.clear();
    }

    /// Generates `dest` from the skeleton's `source` template, optionally with the
    /// project name as naming context.
    pub fn generate(&self, source: &str, dest: &str, named: bool) -> TrellisResult<bool> {
        let name = named.then(|| self.options.name());
        generate_file(self.template(source), self.target(dest), name, &self.variables)
    }

    /// `config.ini` or `config.php` depending on `useConfigIni`, followed by
    /// `extra` files copied into `app/config`. All use the project name.
    pub fn create_config(&self, extra: &[&str]) -> TrellisResult<()> {
        let config = format!("config.{}", self.config_extension());
        self.generate(&config, &format!("app/config/{config}"), true)?;
        for file in extra {
            self.generate(file, &format!("app/config/{file}"), true)?;
        }
        Ok(())
    }

    pub fn config_extension(&self) -> &'static str {
        if self.options.use_config_ini() {
            "ini"
        } else {
            "php"
        }
    }

    pub fn create_bootstrap(&self) -> TrellisResult<()> {
        self.generate("index.php", "public/index.php", false)?;
        Ok(())
    }

    /// Root `.htaccess`, `public/.htaccess` and the fallback `index.html`.
    /// Existing files are left alone.
    pub fn create_rewrite_files(&self) -> TrellisResult<()> {
        write_if_absent(self.target(".htaccess"), ROOT_HTACCESS)?;
        copy_if_absent(self.template("htaccess"), self.target("public/.htaccess"))?;
        write_if_absent(self.target("index.html"), REWRITE_DISABLED_PAGE)?;
        Ok(())
    }

    /// Generates each `views/<view>.<engine>` into `app/views`.
    pub fn create_views(&self, views: &[&str]) -> TrellisResult<()> {
        let ext = self.options.template_engine().extension();
        for view in views {
            let file = format!("views/{view}.{ext}");
            self.generate(&file, &format!("app/{file}"), false)?;
        }
        Ok(())
    }
}
