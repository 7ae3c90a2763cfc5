//! Inline flag resolution. A single `flag<open>k<close>` token inside a
//! path segment decides whether the whole entry exists in the output; the
//! same token inside a content line decides whether that line survives.
//! Surviving carriers get the token stripped.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use crate::strategy::conditional::scan_token_shapes;
use crate::strategy::{ResolutionStrategy, StrategyKind, UnaccountedToken};
use crate::syntax::{count_matches, render_token, SyntaxPair, FLAG_NOT_PREFIX, FLAG_PREFIX};
use indexmap::IndexMap;
use log::debug;
use std::path::PathBuf;

pub struct InlineFlagResolver;

struct TokenScan {
    token: String,
    inverse: bool,
}

fn scans_for(key: &str, pairs: &[SyntaxPair]) -> Vec<TokenScan> {
    let mut scans = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        scans.push(TokenScan { token: render_token(FLAG_PREFIX, key, pair), inverse: false });
        scans.push(TokenScan { token: render_token(FLAG_NOT_PREFIX, key, pair), inverse: true });
    }
    scans
}

/// True when `text` carries a token whose polarity disagrees with the
/// flag's value: a normal token with the flag false, or an inverse token
/// with the flag true.
fn rejected_by(text: &str, value: bool, scans: &[TokenScan]) -> bool {
    scans.iter().any(|scan| {
        text.contains(&scan.token) && if scan.inverse { value } else { !value }
    })
}

/// Strips every rendering of the flag token from `text`. A token directly
/// preceded by a configured comment prefix takes the prefix with it, so
/// commented-out directives leave no dangling marker.
fn strip_tokens(text: &str, scans: &[TokenScan], comments: &[String]) -> String {
    let mut out = text.to_string();
    for scan in scans {
        for comment in comments {
            let commented = format!("{}{}", comment, scan.token);
            out = out.replace(&commented, "");
        }
        out = out.replace(&scan.token, "");
    }
    out
}

impl ResolutionStrategy for InlineFlagResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::InlineFlag
    }

    /// The one strategy whose counting surface spans both metadata and
    /// content, each gated separately by the entry's skip policy.
    fn count(&self, settings: &Settings, entries: &[TemplateEntry]) -> IndexMap<String, usize> {
        let mut tally = IndexMap::new();
        for key in settings.flags.keys() {
            let scans = scans_for(key, &settings.syntax);
            let mut total = 0;
            for entry in entries {
                if entry.content_in_scope(StrategyKind::InlineFlag) {
                    if let Some(text) = entry.text() {
                        for scan in &scans {
                            total += count_matches(text, &scan.token);
                        }
                    }
                }
                if entry.paths_in_scope(StrategyKind::InlineFlag) {
                    for scan in &scans {
                        total += count_matches(&entry.metadata().relative_path, &scan.token);
                    }
                }
            }
            tally.insert(key.clone(), total);
        }
        tally
    }

    fn resolve_paths(
        &self,
        settings: &Settings,
        entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        let mut kept = Vec::new();

        'entries: for mut entry in entries {
            if !entry.paths_in_scope(StrategyKind::InlineFlag) {
                kept.push(entry);
                continue;
            }

            for (key, value) in &settings.flags {
                let scans = scans_for(key, &settings.syntax);
                if rejected_by(&entry.metadata().relative_path, *value, &scans) {
                    debug!(
                        "Dropping '{}': inline flag '{}' excludes it.",
                        entry.metadata().relative_path,
                        key
                    );
                    continue 'entries;
                }
            }

            // Tokens are stripped from the target path only; the relative
            // path keeps its original spelling for provenance.
            let target = entry.metadata().target_path.to_string_lossy().into_owned();
            let mut stripped = target.clone();
            for key in settings.flags.keys() {
                for scan in scans_for(key, &settings.syntax) {
                    stripped = stripped.replace(&scan.token, "");
                }
            }
            if stripped != target {
                entry.metadata_mut().target_path = PathBuf::from(stripped);
            }
            kept.push(entry);
        }

        Ok(kept)
    }

    fn resolve_contents(
        &self,
        settings: &Settings,
        mut entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        for entry in entries.iter_mut() {
            if !entry.content_in_scope(StrategyKind::InlineFlag) {
                continue;
            }
            let Some(text) = entry.text() else { continue };

            let resolved = text
                .split('\n')
                .filter_map(|line| {
                    for (key, value) in &settings.flags {
                        let scans = scans_for(key, &settings.syntax);
                        if rejected_by(line, *value, &scans) {
                            return None;
                        }
                    }
                    let mut out = line.to_string();
                    for key in settings.flags.keys() {
                        let scans = scans_for(key, &settings.syntax);
                        out = strip_tokens(&out, &scans, &settings.comments);
                    }
                    Some(out)
                })
                .collect::<Vec<_>>()
                .join("\n");

            entry.set_text(resolved);
        }
        Ok(entries)
    }

    fn unaccounted(&self, settings: &Settings, entries: &[TemplateEntry]) -> Vec<UnaccountedToken> {
        scan_token_shapes(settings, entries, &[FLAG_NOT_PREFIX, FLAG_PREFIX], StrategyKind::InlineFlag)
    }
}
