//! Conditional-block resolution. A start line carrying `if<open>k<close>`
//! and the matching `end<open>k<close>` line delimit an inclusive range of
//! physical lines: the flag's value decides whether the body is unwrapped
//! (directive lines removed) or the whole range is deleted. The inverse
//! forms `if!`/`end!` mirror the decision.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use crate::strategy::{ResolutionStrategy, StrategyKind, UnaccountedToken};
use crate::syntax::{
    count_matches, render_token, SyntaxPair, END_NOT_PREFIX, END_PREFIX, IF_NOT_PREFIX, IF_PREFIX,
};
use indexmap::IndexMap;
use log::debug;
use regex::Regex;

pub struct ConditionalResolver;

/// One (polarity, delimiter pair) scan of a flag key over a content string.
struct BlockScan {
    start: String,
    end: String,
    inverse: bool,
}

fn scans_for(key: &str, pairs: &[SyntaxPair]) -> Vec<BlockScan> {
    let mut scans = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        scans.push(BlockScan {
            start: render_token(IF_PREFIX, key, pair),
            end: render_token(END_PREFIX, key, pair),
            inverse: false,
        });
        scans.push(BlockScan {
            start: render_token(IF_NOT_PREFIX, key, pair),
            end: render_token(END_NOT_PREFIX, key, pair),
            inverse: true,
        });
    }
    scans
}

/// Resolves every block of every declared flag in one content string.
/// Blocks are paired i-th start with i-th end per scan; a scan whose start
/// and end counts disagree, or whose pairing is out of order, is left
/// unchanged rather than guessed at.
fn resolve_content(
    content: &str,
    flags: &IndexMap<String, bool>,
    pairs: &[SyntaxPair],
    path: &str,
) -> String {
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

    for (key, value) in flags {
        for scan in scans_for(key, pairs) {
            let starts: Vec<usize> = lines
                .iter()
                .enumerate()
                .filter(|(_, line)| line.contains(&scan.start))
                .map(|(index, _)| index)
                .collect();
            let ends: Vec<usize> = lines
                .iter()
                .enumerate()
                .filter(|(_, line)| line.contains(&scan.end))
                .map(|(index, _)| index)
                .collect();

            if starts.is_empty() && ends.is_empty() {
                continue;
            }
            if starts.len() != ends.len() {
                debug!(
                    "Mismatched '{}'/'{}' directives in '{}'; leaving content unchanged.",
                    scan.start, scan.end, path
                );
                continue;
            }

            let drop_body = if scan.inverse { *value } else { !*value };
            let mut remove = vec![false; lines.len()];
            let mut out_of_order = false;
            for (&start, &end) in starts.iter().zip(ends.iter()) {
                if start >= end {
                    out_of_order = true;
                    break;
                }
                if drop_body {
                    for index in start..=end {
                        remove[index] = true;
                    }
                } else {
                    remove[start] = true;
                    remove[end] = true;
                }
            }
            if out_of_order {
                debug!(
                    "Out-of-order '{}'/'{}' directives in '{}'; leaving content unchanged.",
                    scan.start, scan.end, path
                );
                continue;
            }

            lines = lines
                .into_iter()
                .zip(remove)
                .filter(|(_, removed)| !removed)
                .map(|(line, _)| line)
                .collect();
        }
    }

    lines.join("\n")
}

impl ResolutionStrategy for ConditionalResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Conditional
    }

    /// Start-token occurrences capped at the terminator count for the same
    /// scan, so unterminated blocks never inflate the tally.
    fn count(&self, settings: &Settings, entries: &[TemplateEntry]) -> IndexMap<String, usize> {
        let mut tally = IndexMap::new();
        for key in settings.flags.keys() {
            let scans = scans_for(key, &settings.syntax);
            let mut total = 0;
            for entry in entries {
                if !entry.content_in_scope(StrategyKind::Conditional) {
                    continue;
                }
                let Some(text) = entry.text() else { continue };
                for scan in &scans {
                    let starts = count_matches(text, &scan.start);
                    let ends = count_matches(text, &scan.end);
                    total += starts.min(ends);
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
            if !entry.content_in_scope(StrategyKind::Conditional) {
                continue;
            }
            let Some(text) = entry.text() else { continue };
            let path = entry.metadata().relative_path.clone();
            let resolved = resolve_content(text, &settings.flags, &settings.syntax, &path);
            entry.set_text(resolved);
        }
        Ok(entries)
    }

    /// Wildcard scan for anything shaped like a conditional start token,
    /// declared or not. Surfaces typos and conservatively skipped blocks.
    fn unaccounted(&self, settings: &Settings, entries: &[TemplateEntry]) -> Vec<UnaccountedToken> {
        scan_token_shapes(settings, entries, &[IF_NOT_PREFIX, IF_PREFIX], StrategyKind::Conditional)
    }
}

/// Shared wildcard scan: `prefix<open>...<close>` with a lazy body match,
/// once per configured pair. Also used by the inline-flag resolver.
pub(crate) fn scan_token_shapes(
    settings: &Settings,
    entries: &[TemplateEntry],
    prefixes: &[&str],
    kind: StrategyKind,
) -> Vec<UnaccountedToken> {
    let mut found = Vec::new();
    for pair in &settings.syntax {
        for prefix in prefixes {
            let pattern = format!(
                "{}{}.*?{}",
                regex::escape(prefix),
                regex::escape(&pair.open),
                regex::escape(&pair.close)
            );
            let Ok(matcher) = Regex::new(&pattern) else { continue };
            for entry in entries {
                if !entry.content_in_scope(kind) {
                    continue;
                }
                let Some(text) = entry.text() else { continue };
                for token in matcher.find_iter(text) {
                    found.push(UnaccountedToken {
                        path: entry.metadata().relative_path.clone(),
                        token: token.as_str().to_string(),
                    });
                }
            }
        }
    }
    found
}
