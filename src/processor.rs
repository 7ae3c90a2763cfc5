//! Template enumeration, content loading, and output writing.
//! Bridges the on-disk template tree and the virtual file model the
//! resolution pipeline operates on: glob specs expand to metadata-only
//! entries, content is loaded with UTF-8 sniffing once paths are resolved,
//! and resolved entries are materialized under the output root.

use crate::config::{GlobSpec, Settings};
use crate::error::{Error, Result};
use crate::model::{Content, Metadata, SkipPolicy, TemplateEntry};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct Processor<'a> {
    settings: &'a Settings,
    template_root: &'a Path,
    output_root: &'a Path,
    ignored: &'a GlobSet,
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

impl<'a> Processor<'a> {
    pub fn new(
        settings: &'a Settings,
        template_root: &'a Path,
        output_root: &'a Path,
        ignored: &'a GlobSet,
    ) -> Self {
        Self { settings, template_root, output_root, ignored }
    }

    /// Expands every configured glob spec into metadata-only entries.
    /// Specs are processed in order; the first spec to match a path wins,
    /// so copy-only specs listed later cannot re-claim parsed entries.
    pub fn enumerate(&self) -> Result<Vec<TemplateEntry>> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for spec in self.settings.globs.iter().chain(self.settings.copy_only.iter()) {
            self.enumerate_spec(spec, &mut entries, &mut seen)?;
        }
        Ok(entries)
    }

    fn enumerate_spec(
        &self,
        spec: &GlobSpec,
        entries: &mut Vec<TemplateEntry>,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        let include = build_glob_set(&spec.include)?;
        let ignore = build_glob_set(&spec.ignore)?;

        let walk_root = self.template_root.join(&spec.root);
        if !walk_root.exists() {
            debug!("Glob root '{}' does not exist; skipping.", walk_root.display());
            return Ok(());
        }

        for dir_entry in WalkDir::new(&walk_root) {
            let dir_entry = dir_entry.map_err(|e| Error::TemplateError(e.to_string()))?;
            let path = dir_entry.path();

            let relative = path
                .strip_prefix(self.template_root)
                .map_err(|e| Error::TemplateError(e.to_string()))?;
            let Some(relative) = relative.to_str() else {
                return Err(Error::TemplateError(format!(
                    "Non-UTF-8 path: {}",
                    path.display()
                )));
            };
            if relative.is_empty() {
                continue;
            }

            if self.ignored.is_match(relative) || ignore.is_match(relative) {
                debug!("Skipping ignored path '{}'.", relative);
                continue;
            }
            // Directories ride along so empty template folders survive;
            // leftover ones are swept after writing.
            if path.is_file() && !include.is_match(relative) {
                continue;
            }
            if !seen.insert(relative.to_string()) {
                continue;
            }

            debug!("Enumerated '{}'.", relative);
            entries.push(self.make_entry(path, relative, spec.skip));
        }
        Ok(())
    }

    fn make_entry(&self, path: &Path, relative: &str, skip: SkipPolicy) -> TemplateEntry {
        let metadata = Metadata {
            source_path: path.to_path_buf(),
            target_path: self.output_root.join(relative),
            relative_path: relative.to_string(),
        };
        if path.is_dir() {
            TemplateEntry::Folder { metadata, skip }
        } else {
            TemplateEntry::File { metadata, content: None, skip }
        }
    }

    /// Loads file bytes, sniffing UTF-8 text from binary. Entries whose
    /// policy bypasses all content resolution stay unloaded and are copied
    /// verbatim at write time.
    pub fn load_contents(&self, entries: Vec<TemplateEntry>) -> Result<Vec<TemplateEntry>> {
        entries
            .into_iter()
            .map(|entry| match entry {
                TemplateEntry::File { metadata, skip, content } => {
                    if skip.bypasses_content() {
                        return Ok(TemplateEntry::File { metadata, content, skip });
                    }
                    let bytes = fs::read(&metadata.source_path)?;
                    let content = match String::from_utf8(bytes) {
                        Ok(text) => Content::Text(text),
                        Err(e) => Content::Binary(e.into_bytes()),
                    };
                    Ok(TemplateEntry::File { metadata, content: Some(content), skip })
                }
                folder => Ok(folder),
            })
            .collect()
    }

    /// Materializes resolved entries under the output root.
    pub fn write(&self, entries: &[TemplateEntry]) -> Result<()> {
        for entry in entries {
            let target = &entry.metadata().target_path;
            match entry {
                TemplateEntry::Folder { .. } => {
                    fs::create_dir_all(absolute(target))?;
                }
                TemplateEntry::File { content: Some(Content::Text(text)), .. } => {
                    write_file(text.as_bytes(), target)?;
                    println!("created: '{}'", target.display());
                }
                TemplateEntry::File { content: Some(Content::Binary(bytes)), .. } => {
                    write_file(bytes, target)?;
                    println!("created: '{}'", target.display());
                }
                TemplateEntry::File { metadata, content: None, .. } => {
                    copy_file(&metadata.source_path, target)?;
                    println!("copied: '{}'", target.display());
                }
            }
        }
        Ok(())
    }

    /// Removes output directories that ended up empty after generation,
    /// deepest first so parents emptied by the sweep go too.
    pub fn remove_empty_dirs(&self) -> Result<()> {
        let mut dirs: Vec<PathBuf> = WalkDir::new(self.output_root)
            .into_iter()
            .filter_map(|dir_entry| dir_entry.ok())
            .filter(|dir_entry| dir_entry.path().is_dir())
            .map(|dir_entry| dir_entry.path().to_path_buf())
            .collect();
        dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));

        for dir in dirs {
            if dir == self.output_root {
                continue;
            }
            if fs::read_dir(&dir)?.next().is_none() {
                debug!("Removing empty directory '{}'.", dir.display());
                fs::remove_dir(&dir)?;
            }
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

fn write_file(content: &[u8], dest_path: &Path) -> Result<()> {
    let abs_path = absolute(dest_path);
    if let Some(parent) = abs_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(abs_path, content).map_err(Error::IoError)
}

fn copy_file(source_path: &Path, dest_path: &Path) -> Result<()> {
    let abs_dest = absolute(dest_path);
    if let Some(parent) = abs_dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source_path, abs_dest).map(|_| ()).map_err(Error::IoError)
}
