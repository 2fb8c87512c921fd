use super::{ProjectBuilder, Scaffold};
use crate::constants::MARKER_DIR;
use crate::error::TrellisResult;
use crate::options::Options;

/// Directories of a micro application
pub const MICRO_DIRECTORIES: [&str; 12] = [
    "app",
    "app/config",
    "app/models",
    "app/views",
    "app/migrations",
    "public",
    "public/img",
    "public/css",
    "public/temp",
    "public/files",
    "public/js",
    MARKER_DIR,
];

/// Builder for single-file micro application skeletons.
pub struct MicroBuilder<'a> {
    scaffold: Scaffold<'a>,
}

impl<'a> MicroBuilder<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self { scaffold: Scaffold::new(options) }
    }
}

impl ProjectBuilder for MicroBuilder<'_> {
    fn directories(&self) -> &'static [&'static str] {
        &MICRO_DIRECTORIES
    }

    fn build(&mut self) -> TrellisResult<bool> {
        self.scaffold.build_directories(self.directories())?;
        self.scaffold.resolve_variables()?;

        self.scaffold.create_config(&["services.php", "loader.php"])?;
        self.scaffold.generate("app.php", "app/app.php", true)?;
        self.scaffold.create_bootstrap()?;
        self.scaffold.create_rewrite_files()?;
        self.scaffold.create_views(&["index", "404"])?;

        self.scaffold.finish();
        Ok(true)
    }
}
