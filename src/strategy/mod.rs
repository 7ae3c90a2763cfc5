//! Resolution strategies for the template pipeline.
//! Every strategy implements the same four-operation contract against the
//! shared settings record and the virtual file set; the orchestrator runs
//! them in a fixed order.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use indexmap::IndexMap;

pub mod conditional;
pub mod guid;
pub mod inline_flag;
pub mod package_manifest;
pub mod variable;

pub use conditional::ConditionalResolver;
pub use guid::{GuidGenerator, GuidResolver, UuidGenerator};
pub use inline_flag::InlineFlagResolver;
pub use package_manifest::PackageManifestResolver;
pub use variable::VariableResolver;

/// Tags a strategy with the directive family its tallies belong to. The
/// orchestrator's counting dispatch matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Guid,
    Conditional,
    InlineFlag,
    Variable,
    PackageManifest,
}

/// A directive-shaped token found in resolved output that corresponds to no
/// declared key. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaccountedToken {
    /// Relative path of the entry the token was found in.
    pub path: String,
    pub token: String,
}

/// Common contract for all resolution strategies.
pub trait ResolutionStrategy {
    fn kind(&self) -> StrategyKind;

    /// Read-only occurrence scan, keyed by declared directive key. Must not
    /// mutate entries; used purely for diagnostics.
    fn count(&self, settings: &Settings, entries: &[TemplateEntry]) -> IndexMap<String, usize>;

    /// Transforms or filters entry metadata. May drop entries entirely.
    fn resolve_paths(
        &self,
        _settings: &Settings,
        entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        Ok(entries)
    }

    /// Transforms textual content. Count-preserving: returns exactly as
    /// many entries as it was given, leaving binary and skip-gated entries
    /// unchanged.
    fn resolve_contents(
        &self,
        settings: &Settings,
        entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>>;

    /// Best-effort scan for directive-shaped leftovers in resolved content.
    /// Never blocks generation.
    fn unaccounted(
        &self,
        _settings: &Settings,
        _entries: &[TemplateEntry],
    ) -> Vec<UnaccountedToken> {
        Vec::new()
    }
}
