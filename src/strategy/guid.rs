//! GUID rotation. Every GUID declared in the template descriptor is
//! replaced with a freshly generated value so scaffolded projects never
//! share identifiers with their template or with each other.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use crate::strategy::{ResolutionStrategy, StrategyKind};
use crate::syntax::count_matches;
use indexmap::IndexMap;
use uuid::Uuid;

/// Collaborator producing fresh, collision-free GUID strings.
pub trait GuidGenerator {
    fn generate(&self) -> String;
}

/// Version 4 UUID generator used by the CLI.
pub struct UuidGenerator;

impl GuidGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Replaces declared GUIDs in file content. Matching is case-insensitive:
/// the all-lowercase and all-uppercase renderings of each declared GUID are
/// both rewritten to the same fresh value. Paths are left alone.
pub struct GuidResolver {
    generator: Box<dyn GuidGenerator>,
}

impl GuidResolver {
    pub fn new(generator: Box<dyn GuidGenerator>) -> Self {
        Self { generator }
    }
}

impl ResolutionStrategy for GuidResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Guid
    }

    fn count(&self, settings: &Settings, entries: &[TemplateEntry]) -> IndexMap<String, usize> {
        let mut tally = IndexMap::new();
        for declared in &settings.guids {
            let needle = declared.to_lowercase();
            let mut total = 0;
            for entry in entries {
                if !entry.content_in_scope(StrategyKind::Guid) {
                    continue;
                }
                if let Some(text) = entry.text() {
                    total += count_matches(&text.to_lowercase(), &needle);
                }
            }
            tally.insert(declared.clone(), total);
        }
        tally
    }

    fn resolve_contents(
        &self,
        settings: &Settings,
        mut entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        if settings.guids.is_empty() {
            return Ok(entries);
        }

        // One fresh value per declared GUID for the whole run; the same
        // template GUID must map to the same replacement in every file.
        let replacements: Vec<(String, String, String)> = settings
            .guids
            .iter()
            .map(|declared| {
                (declared.to_lowercase(), declared.to_uppercase(), self.generator.generate())
            })
            .collect();

        for entry in entries.iter_mut() {
            if !entry.content_in_scope(StrategyKind::Guid) {
                continue;
            }
            let Some(text) = entry.text() else { continue };
            let mut resolved = text.to_string();
            for (lower, upper, fresh) in &replacements {
                resolved = resolved.replace(lower, fresh).replace(upper, fresh);
            }
            entry.set_text(resolved);
        }
        Ok(entries)
    }
}
