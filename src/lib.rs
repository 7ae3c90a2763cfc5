//! stencil is a directive-driven template resolution engine for project
//! scaffolding. Given a template tree plus user-supplied variables, flags,
//! GUIDs and delimiter syntaxes, it rewrites file paths and contents into
//! a materialized output directory.

/// Command-line interface module for the stencil application
pub mod cli;

/// Descriptor loading, interactive evaluation, and settings normalization
pub mod config;

/// Common constants used across the application
pub mod constants;

/// Error types and handling for the stencil application
pub mod error;

/// File and directory ignore patterns
/// Processes .stencilignore files to exclude specific paths
pub mod ignore;

/// Template source loading (local directories and git repositories)
pub mod loader;

/// Virtual file model: File/Folder entries, metadata, skip policies
pub mod model;

/// Pipeline orchestration: ordered strategies, counting, diagnostics
pub mod parser;

/// Template enumeration, content loading, and output writing
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Occurrence tallies and unused-directive reporting
pub mod report;

/// Resolution strategies: GUID rotation, conditional blocks, inline
/// flags, variables, package manifests
pub mod strategy;

/// Delimiter syntax handling for directive tokens
pub mod syntax;
