//! Error handling for the stencil application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for stencil operations.
///
/// Only two classes are fatal for a generation run: shape errors in the
/// template descriptor and IO/loading failures. Everything the resolution
/// pipeline diagnoses (unused keys, leftover directive tokens, malformed
/// blocks) is reported as a warning instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while loading or walking a template
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Represents errors in descriptor parsing or settings normalization
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// A descriptor leaf whose shape cannot be coerced; reported with the
    /// offending dotted key path
    #[error("Invalid value for '{key_path}': expected {expected}.")]
    ShapeError { key_path: String, expected: String },

    /// Represents errors in glob pattern compilation
    #[error("Glob error: {0}.")]
    GlobError(#[from] globset::Error),

    /// Represents errors during git template cloning
    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    /// Represents errors during user interaction
    #[error("Prompt error: {0}.")]
    PromptError(String),

    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },
}

/// Convenience type alias for Results with stencil's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
