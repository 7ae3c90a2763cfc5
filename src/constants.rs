//! Common constants used throughout the stencil application.

/// Supported descriptor file names
pub const CONFIG_FILES: [&str; 3] = ["stencil.json", "stencil.yml", "stencil.yaml"];

/// Stencil's ignore file name
pub const IGNORE_FILE: &str = ".stencilignore";

/// Key prefixes that carry documentation bookkeeping rather than directives;
/// never reported as unused.
pub const RESERVED_KEY_PREFIXES: [&str; 2] = ["docs.", "folder."];
