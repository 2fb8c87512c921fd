//! Trellis's main application entry point.
//! Parses arguments, assembles the tool context and dispatches to the
//! project builder or the config scanner.

use std::path::{Path, PathBuf};

use log::info;
use trellis::{
    builder::builder_for,
    cli::{get_args, Args, Command},
    config::ConfigScanner,
    context::ToolContext,
    error::{default_error_handler, TrellisError, TrellisResult},
    options::Options,
    path::PathResolver,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Resolves a user-supplied directory against the working directory.
fn resolve_dir(working_dir: &Path, dir: Option<PathBuf>) -> PathBuf {
    let resolver = PathResolver::new(working_dir.to_string_lossy());
    match dir {
        Some(dir) if resolver.is_absolute_path(&dir.to_string_lossy()) => dir,
        Some(dir) => working_dir.join(dir),
        None => working_dir.to_path_buf(),
    }
}

fn run(args: Args) -> TrellisResult<()> {
    let working_dir = std::env::current_dir()?;
    let templates = args
        .templates
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"));

    match args.command {
        Command::Project {
            name,
            directory,
            kind,
            use_config_ini,
            template_engine,
            enable_webtools,
        } => {
            let ctx = ToolContext::new(&working_dir, templates);
            let project_path = resolve_dir(&working_dir, directory).join(&name);

            let options = Options::builder(&ctx)
                .set("projectPath", project_path.to_string_lossy().into_owned())?
                .set("name", name.as_str())?
                .set("type", kind.as_str())?
                .set("useConfigIni", use_config_ini)?
                .set("templateEngine", template_engine)?
                .set("enableWebTools", enable_webtools)?
                .build()?;

            if PathResolver::new(project_path.to_string_lossy()).has_marker_directory() {
                info!("{} is already a project, existing files are kept", project_path.display());
            }

            builder_for(&options).build()?;
            println!("Project '{}' was successfully created in {}.", name, project_path.display());
        }
        Command::Config { basename, directory } => {
            let ctx = ToolContext::new(resolve_dir(&working_dir, directory), templates);
            let config = ConfigScanner::new(&ctx).load(&basename)?;

            info!("Loaded {} config from {}", config.adapter(), config.source().display());
            let rendered = serde_json::to_string_pretty(config.data())
                .map_err(|e| TrellisError::ConfigError(e.to_string()))?;
            println!("{rendered}");
        }
    }

    Ok(())
}
