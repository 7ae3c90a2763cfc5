//! Package-manifest pruning. `packages.*` flags declared false remove the
//! matching keys from the `dependencies` and `devDependencies` tables of
//! scaffolded package.json files. Manifests are parsed permissively
//! (trailing commas, comments) and re-emitted with stable 2-space
//! indentation in their original key order.

use crate::config::Settings;
use crate::error::Result;
use crate::model::TemplateEntry;
use crate::strategy::{ResolutionStrategy, StrategyKind};
use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

const MANIFEST_FILE: &str = "package.json";
const PACKAGE_FLAG_PREFIX: &str = "packages.";
const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "devDependencies"];

pub struct PackageManifestResolver;

fn is_manifest(entry: &TemplateEntry) -> bool {
    entry.is_file()
        && entry
            .metadata()
            .target_path
            .file_name()
            .map(|name| name == MANIFEST_FILE)
            .unwrap_or(false)
}

/// Declared package flags as (tally key, package name, value).
fn package_flags(settings: &Settings) -> Vec<(&String, &str, bool)> {
    settings
        .flags
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(PACKAGE_FLAG_PREFIX).map(|name| (key, name, *value))
        })
        .collect()
}

fn parse_manifest(text: &str) -> std::result::Result<Value, json5::Error> {
    json5::from_str(text)
}

fn table_contains(manifest: &Value, package: &str) -> bool {
    DEPENDENCY_TABLES.iter().any(|table| {
        manifest
            .get(table)
            .and_then(Value::as_object)
            .map(|entries| entries.contains_key(package))
            .unwrap_or(false)
    })
}

impl ResolutionStrategy for PackageManifestResolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PackageManifest
    }

    /// Existence check rather than a text-occurrence count: one tally per
    /// manifest that lists the package in either dependency table.
    fn count(&self, settings: &Settings, entries: &[TemplateEntry]) -> IndexMap<String, usize> {
        let flags = package_flags(settings);
        let mut tally: IndexMap<String, usize> =
            flags.iter().map(|(key, _, _)| ((*key).clone(), 0)).collect();

        for entry in entries {
            if !is_manifest(entry) {
                continue;
            }
            let Some(text) = entry.text() else { continue };
            let Ok(manifest) = parse_manifest(text) else { continue };
            for (key, name, _) in &flags {
                if table_contains(&manifest, name) {
                    *tally.entry((*key).clone()).or_insert(0) += 1;
                }
            }
        }
        tally
    }

    fn resolve_contents(
        &self,
        settings: &Settings,
        mut entries: Vec<TemplateEntry>,
    ) -> Result<Vec<TemplateEntry>> {
        let removals: Vec<&str> = package_flags(settings)
            .into_iter()
            .filter(|(_, _, value)| !value)
            .map(|(_, name, _)| name)
            .collect();
        if removals.is_empty() {
            return Ok(entries);
        }

        for entry in entries.iter_mut() {
            if !is_manifest(entry) {
                continue;
            }
            let Some(text) = entry.text() else { continue };
            let path = entry.metadata().relative_path.clone();

            let mut manifest = match parse_manifest(text) {
                Ok(manifest) => manifest,
                Err(e) => {
                    // Local to this entry; the run continues.
                    warn!("Could not parse manifest '{}': {}.", path, e);
                    continue;
                }
            };

            for table in DEPENDENCY_TABLES {
                let Some(dependencies) = manifest.get_mut(table).and_then(Value::as_object_mut)
                else {
                    continue;
                };
                for package in &removals {
                    dependencies.shift_remove(*package);
                }
            }

            match serde_json::to_string_pretty(&manifest) {
                Ok(serialized) => entry.set_text(serialized),
                Err(e) => warn!("Could not serialize manifest '{}': {}.", path, e),
            }
        }
        Ok(entries)
    }
}
