//! Variable substitution. Every rendering of `var<open>key<close>` is
//! unconditionally replaced with the declared value. Runs after the
//! structural strategies so its edits cannot disturb block boundaries.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use crate::strategy::{ResolutionStrategy, StrategyKind};
use crate::syntax::{count_matches, render_tokens, VAR_PREFIX};
use indexmap::IndexMap;

pub struct VariableResolver;

impl ResolutionStrategy for VariableResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Variable
    }

    fn count(&self, settings: &Settings, entries: &[TemplateEntry]) -> IndexMap<String, usize> {
        let mut tally = IndexMap::new();
        for key in settings.variables.keys() {
            let tokens = render_tokens(VAR_PREFIX, key, &settings.syntax);
            let mut total = 0;
            for entry in entries {
                if !entry.content_in_scope(StrategyKind::Variable) {
                    continue;
                }
                let Some(text) = entry.text() else { continue };
                for token in &tokens {
                    total += count_matches(text, token);
                }
            }
            tally.insert(key.clone(), total);
        }
        tally
    }

    fn resolve_contents(
        &self,
        settings: &Settings,
        mut entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        for entry in entries.iter_mut() {
            if !entry.content_in_scope(StrategyKind::Variable) {
                continue;
            }
            let Some(text) = entry.text() else { continue };
            let mut resolved = text.to_string();
            for (key, value) in &settings.variables {
                for token in render_tokens(VAR_PREFIX, key, &settings.syntax) {
                    resolved = resolved.replace(&token, value);
                }
            }
            entry.set_text(resolved);
        }
        Ok(entries)
    }
}
