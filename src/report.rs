//! Occurrence tallies and unused-directive reporting.
//! The orchestrator owns one report per generation run; strategies only
//! ever return fresh tally maps that get folded in here.

use crate::config::Settings;
use crate::constants::RESERVED_KEY_PREFIXES;
use indexmap::IndexMap;

/// Running per-family occurrence tallies, seeded to zero for every declared
/// key so "declared but never used" is representable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceReport {
    pub flags: IndexMap<String, usize>,
    pub variables: IndexMap<String, usize>,
    pub guids: IndexMap<String, usize>,
}

fn seed<'a, I: Iterator<Item = &'a String>>(keys: I) -> IndexMap<String, usize> {
    keys.map(|key| (key.clone(), 0)).collect()
}

fn fold(tally: &mut IndexMap<String, usize>, counts: IndexMap<String, usize>) {
    for (key, count) in counts {
        *tally.entry(key).or_insert(0) += count;
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEY_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

fn unused(tally: &IndexMap<String, usize>) -> Vec<&str> {
    tally
        .iter()
        .filter(|(key, count)| **count == 0 && !is_reserved(key))
        .map(|(key, _)| key.as_str())
        .collect()
}

impl OccurrenceReport {
    pub fn seeded(settings: &Settings) -> Self {
        Self {
            flags: seed(settings.flags.keys()),
            variables: seed(settings.variables.keys()),
            guids: seed(settings.guids.iter()),
        }
    }

    pub fn merge_flags(&mut self, counts: IndexMap<String, usize>) {
        fold(&mut self.flags, counts);
    }

    pub fn merge_variables(&mut self, counts: IndexMap<String, usize>) {
        fold(&mut self.variables, counts);
    }

    pub fn merge_guids(&mut self, counts: IndexMap<String, usize>) {
        fold(&mut self.guids, counts);
    }

    /// Declared flags with zero measured occurrences. Reserved bookkeeping
    /// prefixes are excluded from the warning surface.
    pub fn unused_flags(&self) -> Vec<&str> {
        unused(&self.flags)
    }

    pub fn unused_variables(&self) -> Vec<&str> {
        unused(&self.variables)
    }

    pub fn unused_guids(&self) -> Vec<&str> {
        unused(&self.guids)
    }
}
