//! Trellis scaffolds web application projects.
//! It locates an existing application's config file across the usual layouts
//! and formats, and materializes new project skeletons from templates with
//! `@@placeholder@@` substitution, never overwriting existing files.

/// Project skeleton builders (micro, simple) and the controller collaborator
pub mod builder;

/// Command-line interface definitions
pub mod cli;

/// Application config discovery and format adapters
/// Supports ini, json, php/php5/inc (statically evaluated) and yml/yaml
pub mod config;

/// Common constants
pub mod constants;

/// Explicit configuration context (install paths, registered adapters)
pub mod context;

/// Error types and handling
pub mod error;

/// Seed file generation and placeholder substitution
pub mod generator;

/// Builder options and their schema
pub mod options;

/// Project root normalization and checks
pub mod path;

/// Namespace validation
pub mod validation;

/// Option-driven template variables
pub mod variables;
