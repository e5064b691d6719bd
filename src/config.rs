//! Bridge settings.
//!
//! Built-in defaults, optionally overridden by `comm/bridge.config.json`
//! (or any file passed with `--config`). Override files ending in `.toml`
//! are read as TOML, everything else as JSON. Keys missing from the file
//! keep their defaults; unknown keys are ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Override file location relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "comm/bridge.config.json";

/// Where a draft gets published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A discussion in the configured category, falling back to an issue.
    Discussion,
    /// An issue with the configured labels.
    Issue,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target repository as `owner/name`.
    pub repo: String,
    pub mode: Mode,
    pub discussion_category: String,
    pub issue_labels: Vec<String>,
    /// Log document, relative to the repository root unless absolute.
    pub log_path: PathBuf,
    /// Source document, relative to the repository root unless absolute.
    pub source_path: PathBuf,
    /// Base URL of the GitHub REST API.
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo: "your-user-or-org/your-repo".to_string(),
            mode: Mode::Discussion,
            discussion_category: "Announcements".to_string(),
            issue_labels: vec!["announcement".to_string(), "external-comm".to_string()],
            log_path: PathBuf::from("comm/logs/_index.md"),
            source_path: PathBuf::from("comm/direct_drop.md"),
            api_url: "https://api.github.com".to_string(),
        }
    }
}

/// On-disk shape of the override document. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct Overrides {
    repo: Option<String>,
    mode: Option<String>,
    discussion_category: Option<String>,
    issue_labels: Option<Vec<String>>,
    log_path: Option<PathBuf>,
    source_path: Option<PathBuf>,
    api_url: Option<String>,
}

impl Settings {
    /// Load settings, applying the override file at `path` if it exists.
    ///
    /// A file that cannot be read or parsed is reported as a warning and
    /// the defaults are used unchanged.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config override, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read config, using defaults"
                );
                return Self::default();
            }
        };

        match parse_overrides(path, &contents) {
            Ok(overrides) => {
                tracing::info!(path = %path.display(), "loaded config override");
                Self::default().with(overrides)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not parse config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Split `repo` into owner and repository name.
    pub fn owner_and_repo(&self) -> Result<(&str, &str)> {
        match self.repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner, name))
            }
            _ => Err(BridgeError::MissingConfigValue(self.repo.clone())),
        }
    }

    fn with(mut self, overrides: Overrides) -> Self {
        if let Some(repo) = overrides.repo {
            self.repo = repo;
        }
        if let Some(mode) = overrides.mode {
            self.mode = parse_mode(&mode);
        }
        if let Some(category) = overrides.discussion_category {
            self.discussion_category = category;
        }
        if let Some(labels) = overrides.issue_labels {
            self.issue_labels = labels;
        }
        if let Some(path) = overrides.log_path {
            self.log_path = path;
        }
        if let Some(path) = overrides.source_path {
            self.source_path = path;
        }
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        self
    }
}

fn parse_overrides(path: &Path, contents: &str) -> core::result::Result<Overrides, String> {
    let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }
}

/// Anything other than `discussion` publishes an issue.
fn parse_mode(raw: &str) -> Mode {
    match raw.to_lowercase().as_str() {
        "discussion" => Mode::Discussion,
        "issue" => Mode::Issue,
        other => {
            tracing::warn!(mode = other, "unrecognized mode, publishing as issue");
            Mode::Issue
        }
    }
}
