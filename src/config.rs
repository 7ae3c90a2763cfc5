//! Configuration handling for stencil templates.
//! Loads the template descriptor (stencil.json, stencil.yml, stencil.yaml),
//! answers its question-shaped leaves through a prompt collaborator, and
//! normalizes the result into the settings record the pipeline runs on.

use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::model::SkipPolicy;
use crate::prompt::{flatten_options, Prompter};
use crate::syntax::SyntaxPair;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// One glob spec: which template paths to materialize and which resolvers
/// may touch them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlobSpec {
    /// Subdirectory inside the template to walk; empty means the root.
    pub root: String,
    pub include: Vec<String>,
    pub ignore: Vec<String>,
    pub skip: SkipPolicy,
}

impl Default for GlobSpec {
    fn default() -> Self {
        Self {
            root: String::new(),
            include: vec!["**".to_string()],
            ignore: Vec::new(),
            skip: SkipPolicy::none(),
        }
    }
}

/// Fully normalized template settings. Immutable after construction and
/// shared read-only by every strategy; all array-typed fields are arrays
/// even when the raw descriptor supplied a scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub globs: Vec<GlobSpec>,
    pub copy_only: Vec<GlobSpec>,
    /// Nested variable tree flattened to dotted keys.
    pub variables: IndexMap<String, String>,
    /// Nested flag tree flattened to dotted keys.
    pub flags: IndexMap<String, bool>,
    /// Declared GUIDs in their canonical spelling; matched case-insensitively.
    pub guids: Vec<String>,
    pub syntax: Vec<SyntaxPair>,
    /// Plugin-provider key to plugin identifiers; consumed by the external
    /// installer, never by the pipeline.
    pub plugins: IndexMap<String, Vec<String>>,
    /// Comment prefixes that may precede an inline flag token.
    pub comments: Vec<String>,
    /// Opaque passthrough for plugin collaborators.
    pub plugin_data: Value,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            globs: Vec::new(),
            copy_only: Vec::new(),
            variables: IndexMap::new(),
            flags: IndexMap::new(),
            guids: Vec::new(),
            syntax: Vec::new(),
            plugins: IndexMap::new(),
            comments: Vec::new(),
            plugin_data: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Loads the raw descriptor from a template directory, trying each
/// supported file name in order.
pub fn load_descriptor<P: AsRef<Path>>(template_root: P) -> Result<Value> {
    for file in CONFIG_FILES {
        let path = template_root.as_ref().join(file);
        if path.exists() {
            debug!("Loading descriptor from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            return parse_descriptor(&content);
        }
    }

    Err(Error::ConfigError(format!(
        "No descriptor file found (tried: {})",
        CONFIG_FILES.join(", ")
    )))
}

/// Parses descriptor content, JSON first, YAML as fallback.
pub fn parse_descriptor(content: &str) -> Result<Value> {
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid descriptor format: {}", e))),
    }
}

/// Loads, evaluates and normalizes a template's settings in one step.
pub fn get_settings<P: AsRef<Path>>(
    template_root: P,
    prompt: &dyn Prompter,
    preloaded: &Value,
) -> Result<Settings> {
    let raw = load_descriptor(template_root)?;
    let evaluated = evaluate_descriptor(raw, prompt, preloaded)?;
    normalize(&evaluated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeKind {
    Variables,
    Flags,
}

/// Replaces question-shaped leaves in the descriptor's `variables` and
/// `flags` trees with answers. Preloaded answers (from `--stdin`) take
/// precedence over prompting, keyed by dotted path.
pub fn evaluate_descriptor(
    mut raw: Value,
    prompt: &dyn Prompter,
    preloaded: &Value,
) -> Result<Value> {
    if let Some(variables) = raw.get_mut("variables") {
        evaluate_tree(variables, prompt, preloaded, "", TreeKind::Variables)?;
    }
    if let Some(flags) = raw.get_mut("flags") {
        evaluate_tree(flags, prompt, preloaded, "", TreeKind::Flags)?;
    }
    Ok(raw)
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn lookup_preloaded<'a>(preloaded: &'a Value, path: &str) -> Option<&'a Value> {
    preloaded
        .get(path)
        .or_else(|| path.split('.').try_fold(preloaded, |value, segment| value.get(segment)))
}

fn evaluate_tree(
    node: &mut Value,
    prompt: &dyn Prompter,
    preloaded: &Value,
    path: &str,
    kind: TreeKind,
) -> Result<()> {
    let Value::Object(map) = node else { return Ok(()) };

    if map.contains_key("question") {
        let answered = answer_question(map, prompt, preloaded, path, kind)?;
        *node = answered;
        return Ok(());
    }

    let keys: Vec<String> = map.keys().cloned().collect();
    for key in keys {
        let child_path = join_path(path, &key);
        if let Some(child) = map.get_mut(&key) {
            evaluate_tree(child, prompt, preloaded, &child_path, kind)?;
        }
    }
    Ok(())
}

fn answer_question(
    spec: &serde_json::Map<String, Value>,
    prompt: &dyn Prompter,
    preloaded: &Value,
    path: &str,
    kind: TreeKind,
) -> Result<Value> {
    if let Some(answer) = lookup_preloaded(preloaded, path) {
        return Ok(answer.clone());
    }

    let question = spec.get("question").and_then(Value::as_str).unwrap_or_default();

    match kind {
        TreeKind::Flags => {
            if let Some(choices) = spec.get("choices") {
                let options = flatten_options(choices)?;
                let multiselect =
                    spec.get("multiselect").and_then(Value::as_bool).unwrap_or(false);
                let answers = if multiselect {
                    prompt.ask_checkbox(&options, question)?
                } else {
                    prompt.ask_single_choice(&options, question)?
                };
                Ok(Value::Object(
                    answers.into_iter().map(|(key, value)| (key, Value::Bool(value))).collect(),
                ))
            } else {
                let yes = spec.get("yes").and_then(Value::as_str);
                let no = spec.get("no").and_then(Value::as_str);
                Ok(Value::Bool(prompt.ask_predicate(question, yes, no)?))
            }
        }
        TreeKind::Variables => {
            let mut schema = IndexMap::new();
            schema.insert(path.to_string(), question.to_string());
            let mut answers = prompt.ask_freeform(&schema)?;
            let value = answers.shift_remove(path).unwrap_or_default();
            Ok(Value::String(value))
        }
    }
}

/// Normalizes a raw descriptor into `Settings`. Shape coercion only:
/// scalar-or-array fields become arrays, nested trees are flattened to
/// dotted keys, missing fields default to empty collections. Semantic
/// validation is deferred to the counting diagnostics.
pub fn normalize(raw: &Value) -> Result<Settings> {
    let globs = normalize_globs(raw.get("globs"), "globs")?;
    let copy_only = normalize_globs(raw.get("copyOnly"), "copyOnly")?
        .into_iter()
        .map(|mut spec| {
            spec.skip = SkipPolicy::all();
            spec
        })
        .collect();

    let mut variables = IndexMap::new();
    if let Some(tree) = raw.get("variables") {
        flatten_variables(tree, "", &mut variables)?;
    }

    let mut flags = IndexMap::new();
    if let Some(tree) = raw.get("flags") {
        flatten_flags(tree, "", &mut flags)?;
    }

    let guids = normalize_string_list(raw.get("guid"), "guid")?;
    let syntax = normalize_syntax(raw.get("syntax"))?;
    let comments = normalize_string_list(raw.get("comments"), "comments")?;
    let plugins = normalize_plugins(raw.get("plugins"))?;

    let plugin_data = match raw.get("pluginData") {
        None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
        Some(value) => value.clone(),
    };

    Ok(Settings {
        globs,
        copy_only,
        variables,
        flags,
        guids,
        syntax,
        plugins,
        comments,
        plugin_data,
    })
}

fn normalize_globs(raw: Option<&Value>, key_path: &str) -> Result<Vec<GlobSpec>> {
    let Some(value) = raw else { return Ok(Vec::new()) };
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => {
            items.iter().map(|item| glob_spec_from(item, key_path)).collect()
        }
        single => Ok(vec![glob_spec_from(single, key_path)?]),
    }
}

fn glob_spec_from(value: &Value, key_path: &str) -> Result<GlobSpec> {
    match value {
        // A bare string is a single include pattern over the template root.
        Value::String(pattern) => {
            Ok(GlobSpec { include: vec![pattern.clone()], ..GlobSpec::default() })
        }
        Value::Object(_) => GlobSpec::deserialize(value).map_err(|e| {
            Error::ConfigError(format!("Invalid glob spec under '{}': {}", key_path, e))
        }),
        _ => Err(Error::ShapeError {
            key_path: key_path.to_string(),
            expected: "string or glob object".to_string(),
        }),
    }
}

fn flatten_variables(
    node: &Value,
    path: &str,
    out: &mut IndexMap<String, String>,
) -> Result<()> {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_variables(child, &join_path(path, key), out)?;
            }
            Ok(())
        }
        Value::String(value) => {
            out.insert(path.to_string(), value.clone());
            Ok(())
        }
        _ => Err(Error::ShapeError {
            key_path: if path.is_empty() { "variables".to_string() } else { path.to_string() },
            expected: "string or nested mapping".to_string(),
        }),
    }
}

fn flatten_flags(node: &Value, path: &str, out: &mut IndexMap<String, bool>) -> Result<()> {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_flags(child, &join_path(path, key), out)?;
            }
            Ok(())
        }
        Value::Bool(value) => {
            out.insert(path.to_string(), *value);
            Ok(())
        }
        _ => Err(Error::ShapeError {
            key_path: if path.is_empty() { "flags".to_string() } else { path.to_string() },
            expected: "boolean or nested mapping".to_string(),
        }),
    }
}

fn normalize_string_list(raw: Option<&Value>, key_path: &str) -> Result<Vec<String>> {
    let Some(value) = raw else { return Ok(Vec::new()) };
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(single) => Ok(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| Error::ShapeError {
                    key_path: key_path.to_string(),
                    expected: "string".to_string(),
                })
            })
            .collect(),
        _ => Err(Error::ShapeError {
            key_path: key_path.to_string(),
            expected: "string or list of strings".to_string(),
        }),
    }
}

/// Syntax may arrive as one pair, a flat list, or a nested list of pairs.
/// Flatten fully, then regroup into (open, close) chunks of two.
fn normalize_syntax(raw: Option<&Value>) -> Result<Vec<SyntaxPair>> {
    let Some(value) = raw else { return Ok(Vec::new()) };
    if value.is_null() {
        return Ok(Vec::new());
    }

    let mut flat = Vec::new();
    flatten_syntax(value, &mut flat)?;

    if flat.len() % 2 != 0 {
        return Err(Error::ConfigError(format!(
            "Syntax list has odd length {}; expected (open, close) pairs",
            flat.len()
        )));
    }

    Ok(flat.chunks(2).map(|chunk| SyntaxPair::new(chunk[0].clone(), chunk[1].clone())).collect())
}

fn flatten_syntax(value: &Value, out: &mut Vec<String>) -> Result<()> {
    match value {
        Value::String(delimiter) => out.push(delimiter.clone()),
        Value::Array(items) => {
            for item in items {
                flatten_syntax(item, out)?;
            }
        }
        _ => {
            return Err(Error::ShapeError {
                key_path: "syntax".to_string(),
                expected: "string or list".to_string(),
            })
        }
    }
    Ok(())
}

fn normalize_plugins(raw: Option<&Value>) -> Result<IndexMap<String, Vec<String>>> {
    let Some(value) = raw else { return Ok(IndexMap::new()) };
    match value {
        Value::Null => Ok(IndexMap::new()),
        Value::Object(map) => {
            let mut plugins = IndexMap::new();
            for (provider, ids) in map {
                let key_path = join_path("plugins", provider);
                plugins.insert(provider.clone(), normalize_string_list(Some(ids), &key_path)?);
            }
            Ok(plugins)
        }
        _ => Err(Error::ShapeError {
            key_path: "plugins".to_string(),
            expected: "mapping of provider to plugin list".to_string(),
        }),
    }
}
