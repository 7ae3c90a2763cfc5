//! File and directory ignore pattern handling for stencil templates.
//! Processes .stencilignore files to exclude specific paths from
//! enumeration, similar to .gitignore functionality. The descriptor files
//! and the ignore file itself are always excluded.

use crate::constants::{CONFIG_FILES, IGNORE_FILE};
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Patterns excluded from every template, ignore file or not.
const DEFAULT_PATTERNS: [&str; 2] = ["**/.git/**", "**/.DS_Store"];

/// Reads the template's .stencilignore file (if any) and builds the full
/// exclusion set for enumeration.
///
/// # Notes
/// - Each non-empty line is one glob pattern; `#` starts a comment line
/// - Missing ignore file is fine; the defaults still apply
pub fn parse_stencilignore_file<P: AsRef<Path>>(template_root: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_PATTERNS {
        builder.add(Glob::new(pattern)?);
    }
    for file in CONFIG_FILES {
        builder.add(Glob::new(file)?);
    }
    builder.add(Glob::new(IGNORE_FILE)?);

    let ignore_path = template_root.as_ref().join(IGNORE_FILE);
    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(Glob::new(line)?);
        }
    } else {
        debug!(".stencilignore does not exist")
    }

    Ok(builder.build()?)
}
