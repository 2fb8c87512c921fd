use super::controller::{ControllerGenerator, ControllerRequest, PhpControllerGenerator};
use super::{ProjectBuilder, Scaffold, WebToolsInstaller};
use crate::constants::MARKER_DIR;
use crate::error::TrellisResult;
use crate::generator::copy_if_absent;
use crate::options::Options;
use log::info;

/// Directories of a simple MVC application
pub const SIMPLE_DIRECTORIES: [&str; 17] = [
    "app",
    "app/views",
    "app/config",
    "app/models",
    "app/controllers",
    "app/library",
    "app/migrations",
    "app/views/index",
    "app/views/layouts",
    "cache",
    "public",
    "public/img",
    "public/css",
    "public/temp",
    "public/files",
    "public/js",
    MARKER_DIR,
];

/// Base class every generated controller extends
pub const BASE_CONTROLLER: &str = "ControllerBase";

/// Builder for MVC skeletons with a controller layer.
pub struct SimpleBuilder<'a> {
    scaffold: Scaffold<'a>,
    controllers: Box<dyn ControllerGenerator + 'a>,
    web_tools: Option<&'a dyn WebToolsInstaller>,
}

impl<'a> SimpleBuilder<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            scaffold: Scaffold::new(options),
            controllers: Box::new(PhpControllerGenerator::new()),
            web_tools: None,
        }
    }

    /// Replaces the collaborator that writes the default controller.
    pub fn with_controller_generator<G: ControllerGenerator + 'a>(mut self, generator: G) -> Self {
        self.controllers = Box::new(generator);
        self
    }

    /// Installer run after the build when `enableWebTools` is set.
    pub fn with_web_tools(mut self, installer: &'a dyn WebToolsInstaller) -> Self {
        self.web_tools = Some(installer);
        self
    }

    fn create_router_file(&self) -> TrellisResult<()> {
        copy_if_absent(self.scaffold.template(".htrouter.php"), self.scaffold.target(".htrouter.php"))?;
        Ok(())
    }

    fn create_controllers(&self) -> TrellisResult<()> {
        let base = format!("app/controllers/{BASE_CONTROLLER}.php");
        self.scaffold.generate(&format!("{BASE_CONTROLLER}.php"), &base, true)?;

        let request = ControllerRequest {
            name: "index".to_string(),
            directory: self.scaffold.target(""),
            controllers_dir: self.scaffold.target("app/controllers"),
            base_class: BASE_CONTROLLER.to_string(),
            namespace: None,
        };
        self.controllers.generate(&request)?;
        Ok(())
    }
}

impl ProjectBuilder for SimpleBuilder<'_> {
    fn directories(&self) -> &'static [&'static str] {
        &SIMPLE_DIRECTORIES
    }

    fn build(&mut self) -> TrellisResult<bool> {
        self.scaffold.build_directories(self.directories())?;
        self.scaffold.resolve_variables()?;

        self.scaffold.create_config(&["loader.php", "services.php", "router.php"])?;
        self.scaffold.create_bootstrap()?;
        self.scaffold.create_rewrite_files()?;
        self.create_router_file()?;
        self.scaffold.create_views(&["index", "index/index"])?;
        self.create_controllers()?;

        let options = self.scaffold.options();
        if options.enable_web_tools() {
            match self.web_tools {
                Some(installer) => installer.install(options.project_path())?,
                None => info!("Web tools requested but no installer is configured"),
            }
        }

        self.scaffold.finish();
        Ok(true)
    }
}
