//! User input and interaction handling.
//! The pipeline's strategies never prompt; only descriptor evaluation and
//! the overwrite/clone confirmations go through this collaborator.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use indexmap::IndexMap;
use serde_json::Value;

/// Interactive question collaborator.
pub trait Prompter {
    /// Multi-select over flattened option keys; every key maps to a bool.
    fn ask_checkbox(
        &self,
        options: &IndexMap<String, String>,
        question: &str,
    ) -> Result<IndexMap<String, bool>>;

    /// Single-select; exactly one key maps to true.
    fn ask_single_choice(
        &self,
        options: &IndexMap<String, String>,
        question: &str,
    ) -> Result<IndexMap<String, bool>>;

    /// Yes/no question, optionally with custom answer labels.
    fn ask_predicate(&self, question: &str, yes: Option<&str>, no: Option<&str>) -> Result<bool>;

    /// Freeform text input per schema entry (key -> question).
    fn ask_freeform(
        &self,
        schema: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>>;

    /// Overwrite-style confirmation; `skip` short-circuits to yes.
    fn confirm(&self, skip: bool, question: String) -> Result<bool>;
}

/// Flattens an options tree (a list of strings, or a nested mapping of
/// key -> label or subtree) into dotted option keys.
pub fn flatten_options(value: &Value) -> Result<IndexMap<String, String>> {
    let mut options = IndexMap::new();
    collect_options(value, "", &mut options)?;
    Ok(options)
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn collect_options(
    value: &Value,
    path: &str,
    out: &mut IndexMap<String, String>,
) -> Result<()> {
    match value {
        Value::String(option) => {
            out.insert(join_key(path, option), option.clone());
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                collect_options(item, path, out)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(label) => {
                        out.insert(join_key(path, key), label.clone());
                    }
                    Value::Object(_) | Value::Array(_) => {
                        collect_options(child, &join_key(path, key), out)?;
                    }
                    _ => {
                        return Err(Error::ShapeError {
                            key_path: join_key(path, key),
                            expected: "label string or nested options".to_string(),
                        })
                    }
                }
            }
            Ok(())
        }
        _ => Err(Error::ShapeError {
            key_path: if path.is_empty() { "choices".to_string() } else { path.to_string() },
            expected: "list or mapping of options".to_string(),
        }),
    }
}

/// Dialoguer-backed interactive prompter used by the CLI.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::PromptError(e.to_string())
}

impl Prompter for DialoguerPrompter {
    fn ask_checkbox(
        &self,
        options: &IndexMap<String, String>,
        question: &str,
    ) -> Result<IndexMap<String, bool>> {
        let labels: Vec<&String> = options.values().collect();
        let chosen = MultiSelect::new()
            .with_prompt(question)
            .items(&labels)
            .interact()
            .map_err(prompt_error)?;

        Ok(options
            .keys()
            .enumerate()
            .map(|(index, key)| (key.clone(), chosen.contains(&index)))
            .collect())
    }

    fn ask_single_choice(
        &self,
        options: &IndexMap<String, String>,
        question: &str,
    ) -> Result<IndexMap<String, bool>> {
        let labels: Vec<&String> = options.values().collect();
        let selection = Select::new()
            .with_prompt(question)
            .default(0)
            .items(&labels)
            .interact()
            .map_err(prompt_error)?;

        Ok(options
            .keys()
            .enumerate()
            .map(|(index, key)| (key.clone(), index == selection))
            .collect())
    }

    fn ask_predicate(&self, question: &str, yes: Option<&str>, no: Option<&str>) -> Result<bool> {
        match (yes, no) {
            (Some(yes), Some(no)) => {
                let selection = Select::new()
                    .with_prompt(question)
                    .default(0)
                    .items(&[yes, no])
                    .interact()
                    .map_err(prompt_error)?;
                Ok(selection == 0)
            }
            _ => Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact()
                .map_err(prompt_error),
        }
    }

    fn ask_freeform(
        &self,
        schema: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let mut answers = IndexMap::new();
        for (key, question) in schema {
            let input: String = Input::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            answers.insert(key.clone(), input);
        }
        Ok(answers)
    }

    fn confirm(&self, skip: bool, question: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}
