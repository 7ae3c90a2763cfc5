//! Virtual file model for the resolution pipeline.
//! Entries are in-memory File-or-Folder descriptors with path metadata and
//! optional content, independent of actual disk state until written.

use crate::strategy::StrategyKind;
use serde::Deserialize;
use std::path::PathBuf;

/// Path metadata carried by every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Absolute path of the entry inside the template tree.
    pub source_path: PathBuf,
    /// Absolute path the entry will be written to. Path resolution rewrites
    /// this; `relative_path` stays untouched for provenance.
    pub target_path: PathBuf,
    /// Path relative to the template root.
    pub relative_path: String,
}

/// Loaded file content. Binary entries pass through every content strategy
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

/// Per-strategy gates for one surface of an entry. A gate set to `true`
/// means that strategy leaves the surface alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverGates {
    pub guid: bool,
    pub conditional: bool,
    #[serde(rename = "flag")]
    pub inline_flag: bool,
    pub variable: bool,
}

impl ResolverGates {
    fn all() -> Self {
        Self { guid: true, conditional: true, inline_flag: true, variable: true }
    }

    fn skips(&self, kind: StrategyKind) -> bool {
        match kind {
            StrategyKind::Guid => self.guid,
            StrategyKind::Conditional => self.conditional,
            StrategyKind::InlineFlag => self.inline_flag,
            StrategyKind::Variable => self.variable,
            // Manifest pruning is keyed on the target file name instead of
            // a per-entry gate.
            StrategyKind::PackageManifest => false,
        }
    }
}

/// Per-entry, per-strategy, per-surface gate matrix. Glob configuration can
/// opt entries out of specific kinds of substitution; copy-only globs opt
/// out of everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkipPolicy {
    pub paths: ResolverGates,
    pub contents: ResolverGates,
}

impl SkipPolicy {
    /// Policy that lets every strategy examine both surfaces.
    pub fn none() -> Self {
        Self::default()
    }

    /// Policy for copy-only globs: no strategy examines the entry.
    pub fn all() -> Self {
        Self { paths: ResolverGates::all(), contents: ResolverGates::all() }
    }

    pub fn skips_paths(&self, kind: StrategyKind) -> bool {
        self.paths.skips(kind)
    }

    pub fn skips_contents(&self, kind: StrategyKind) -> bool {
        self.contents.skips(kind)
    }

    /// True when no content strategy may touch the entry, in which case its
    /// content is never loaded and the file is copied verbatim.
    pub fn bypasses_content(&self) -> bool {
        self.contents == ResolverGates::all()
    }
}

/// A file-system entry flowing through the pipeline. Strategies receive
/// entries by value and return fresh vectors; nothing is shared between
/// passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEntry {
    File { metadata: Metadata, content: Option<Content>, skip: SkipPolicy },
    Folder { metadata: Metadata, skip: SkipPolicy },
}

impl TemplateEntry {
    pub fn metadata(&self) -> &Metadata {
        match self {
            TemplateEntry::File { metadata, .. } => metadata,
            TemplateEntry::Folder { metadata, .. } => metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            TemplateEntry::File { metadata, .. } => metadata,
            TemplateEntry::Folder { metadata, .. } => metadata,
        }
    }

    pub fn skip(&self) -> &SkipPolicy {
        match self {
            TemplateEntry::File { skip, .. } => skip,
            TemplateEntry::Folder { skip, .. } => skip,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, TemplateEntry::File { .. })
    }

    /// Textual content, if loaded and textual.
    pub fn text(&self) -> Option<&str> {
        match self {
            TemplateEntry::File { content: Some(Content::Text(text)), .. } => Some(text),
            _ => None,
        }
    }

    /// Replaces textual content. A no-op for folders, binary files and
    /// files whose content has not been loaded.
    pub fn set_text(&mut self, new: String) {
        if let TemplateEntry::File { content: content @ Some(Content::Text(_)), .. } = self {
            *content = Some(Content::Text(new));
        }
    }

    /// Whether `kind` may examine this entry's content surface.
    pub fn content_in_scope(&self, kind: StrategyKind) -> bool {
        self.text().is_some() && !self.skip().skips_contents(kind)
    }

    /// Whether `kind` may examine this entry's path metadata.
    pub fn paths_in_scope(&self, kind: StrategyKind) -> bool {
        !self.skip().skips_paths(kind)
    }
}
