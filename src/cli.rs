//! Command-line interface implementation for trellis.
//! Provides argument parsing using clap.

use crate::constants::TEMPLATES_ENV;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments structure for trellis.
#[derive(Parser, Debug)]
#[command(author, version, about = "Trellis: application config scanner and project skeleton builder", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Root directory of the skeleton templates
    #[arg(long, env = TEMPLATES_ENV, global = true, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project skeleton
    Project {
        /// Project name, also used as the directory name
        #[arg(value_name = "NAME")]
        name: String,

        /// Directory the project directory is created in
        #[arg(short, long, value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Skeleton type
        #[arg(short = 't', long = "type", value_enum, default_value_t = SkeletonArg::Simple)]
        kind: SkeletonArg,

        /// Generate config.ini instead of config.php
        #[arg(long)]
        use_config_ini: bool,

        /// View engine for the default views (phtml or volt)
        #[arg(long, default_value = "phtml")]
        template_engine: String,

        /// Record a web tools request. No installer ships with the binary,
        /// library callers attach one through SimpleBuilder::with_web_tools
        #[arg(long)]
        enable_webtools: bool,
    },

    /// Locate and print an application's config
    Config {
        /// Config basename
        #[arg(value_name = "BASENAME", default_value = "config")]
        basename: String,

        /// Application root to scan
        #[arg(short, long, value_name = "DIR")]
        directory: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkeletonArg {
    Micro,
    Simple,
}

impl SkeletonArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkeletonArg::Micro => "micro",
            SkeletonArg::Simple => "simple",
        }
    }
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
