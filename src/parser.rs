//! Core pipeline orchestration.
//! Drives the ordered resolution strategies over the virtual file set and
//! aggregates per-directive occurrence diagnostics: count passes before
//! and after content loading, unused-key warnings, and the final
//! unaccounted-token advisory.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use crate::report::OccurrenceReport;
use crate::strategy::{
    ConditionalResolver, GuidGenerator, GuidResolver, InlineFlagResolver,
    PackageManifestResolver, ResolutionStrategy, StrategyKind, UnaccountedToken,
    VariableResolver,
};
use log::warn;

pub struct Parser<'a> {
    settings: &'a Settings,
    strategies: Vec<Box<dyn ResolutionStrategy>>,
    report: OccurrenceReport,
}

impl<'a> Parser<'a> {
    /// Builds the pipeline in its fixed order. GUID rotation runs first so
    /// later delimiter scans never see template GUID text; conditional
    /// blocks resolve before inline flags so flag-line removal cannot eat
    /// block boundaries; variable substitution runs after all structural
    /// edits; manifest pruning operates on the final text.
    pub fn new(settings: &'a Settings, generator: Box<dyn GuidGenerator>) -> Self {
        let strategies: Vec<Box<dyn ResolutionStrategy>> = vec![
            Box::new(GuidResolver::new(generator)),
            Box::new(ConditionalResolver),
            Box::new(InlineFlagResolver),
            Box::new(VariableResolver),
            Box::new(PackageManifestResolver),
        ];

        Self { settings, strategies, report: OccurrenceReport::seeded(settings) }
    }

    /// Threads the entry list through every strategy's path step; each
    /// strategy sees the previous strategy's output.
    pub fn resolve_paths(&self, mut entries: Vec<TemplateEntry>) -> Result<Vec<TemplateEntry>> {
        for strategy in &self.strategies {
            entries = strategy.resolve_paths(self.settings, entries)?;
        }
        Ok(entries)
    }

    /// Folds one counting pass into the running report. Strategies return
    /// fresh tally maps; the per-family dispatch is keyed on the strategy's
    /// kind tag and is exhaustive by construction.
    pub fn count_occurrences(&mut self, entries: &[TemplateEntry]) {
        for strategy in &self.strategies {
            let counts = strategy.count(self.settings, entries);
            match strategy.kind() {
                StrategyKind::Conditional
                | StrategyKind::InlineFlag
                | StrategyKind::PackageManifest => self.report.merge_flags(counts),
                StrategyKind::Variable => self.report.merge_variables(counts),
                StrategyKind::Guid => self.report.merge_guids(counts),
            }
        }
    }

    /// Threads the entry list through every strategy's content step.
    pub fn resolve_contents(
        &self,
        mut entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        for strategy in &self.strategies {
            entries = strategy.resolve_contents(self.settings, entries)?;
        }
        Ok(entries)
    }

    /// Combined leftover-token scan across all strategies.
    pub fn unaccounted(&self, entries: &[TemplateEntry]) -> Vec<UnaccountedToken> {
        self.strategies
            .iter()
            .flat_map(|strategy| strategy.unaccounted(self.settings, entries))
            .collect()
    }

    pub fn report(&self) -> &OccurrenceReport {
        &self.report
    }

    /// Non-fatal warnings for declared keys that matched nothing;
    /// generation proceeds.
    pub fn warn_unused(&self) {
        for key in self.report.unused_flags() {
            warn!("Declared flag '{}' never matched anything.", key);
        }
        for key in self.report.unused_variables() {
            warn!("Declared variable '{}' never matched anything.", key);
        }
        for guid in self.report.unused_guids() {
            warn!("Declared GUID '{}' never matched anything.", guid);
        }
    }

    /// Non-fatal advisories for directive-shaped leftovers in the output.
    pub fn warn_unaccounted(&self, tokens: &[UnaccountedToken]) {
        for leftover in tokens {
            warn!("Possible unresolved directive '{}' in '{}'.", leftover.token, leftover.path);
        }
    }
}
