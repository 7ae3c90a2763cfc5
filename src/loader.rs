//! Template source loading.
//! A template argument is either a local directory or a git repository
//! URL; git sources are cloned next to the working directory before
//! generation starts.

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use log::debug;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Represents the source location of a template.
#[derive(Debug)]
pub enum TemplateSource {
    /// Local filesystem template path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS or SSH)
    Git(String),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::FileSystem(path) => {
                write!(f, "local path: '{}'", path.display())
            }
            TemplateSource::Git(repo) => write!(f, "git repository: '{}'", repo),
        }
    }
}

impl TemplateSource {
    /// Classifies a template argument as a git URL or a filesystem path.
    pub fn from_string(s: &str) -> Self {
        if let Ok(parsed) = Url::parse(s) {
            if parsed.scheme() == "https" || parsed.scheme() == "git" {
                return Self::Git(s.to_string());
            }
        }

        // SSH form, e.g. git@github.com:user/repo.git
        if s.starts_with("git@") {
            return Self::Git(s.to_string());
        }

        Self::FileSystem(PathBuf::from(s))
    }
}

fn load_local(path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: path.display().to_string(),
        });
    }
    Ok(path)
}

fn clone_repository(
    prompt: &dyn Prompter,
    repo_url: &str,
    skip_overwrite_check: bool,
) -> Result<PathBuf> {
    debug!("Cloning repository '{}'.", repo_url);

    let repo_name =
        repo_url.split('/').next_back().unwrap_or("template").trim_end_matches(".git");
    let clone_path = PathBuf::from(repo_name);

    if clone_path.exists() {
        let replace = prompt.confirm(
            skip_overwrite_check,
            format!("Directory '{}' already exists. Replace it?", repo_name),
        )?;
        if replace {
            fs::remove_dir_all(&clone_path)?;
        } else {
            debug!("Using existing directory '{}'.", clone_path.display());
            return Ok(clone_path);
        }
    }

    debug!("Cloning to '{}'.", clone_path.display());

    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, _allowed_types| {
        let home = std::env::var("HOME").unwrap_or_default();
        git2::Cred::ssh_key(
            username_from_url.unwrap_or("git"),
            None,
            std::path::Path::new(&format!("{}/.ssh/id_rsa", home)),
            None,
        )
    });

    let mut fetch_opts = git2::FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);

    builder.clone(repo_url, &clone_path)?;
    Ok(clone_path)
}

/// Returns the template directory for the provided template argument,
/// cloning it first when the source is a git repository.
pub fn load_template<S: Into<String>>(
    prompt: &dyn Prompter,
    template: S,
    skip_overwrite_check: bool,
) -> Result<PathBuf> {
    let template: String = template.into();
    let source = TemplateSource::from_string(&template);

    println!("Using template from the {}", source);

    match source {
        TemplateSource::FileSystem(path) => load_local(path),
        TemplateSource::Git(repo) => clone_repository(prompt, &repo, skip_overwrite_check),
    }
}
