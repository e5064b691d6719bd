//! Errors that end a bridge run.
//!
//! Every component returns [`BridgeError`]; only `main` turns one into
//! a diagnostic line and an exit status.

use std::{io, path::PathBuf};

/// Errors that can occur while publishing a draft.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Config 'repo' must be in the form 'owner/repo' (got {0:?}).")]
    MissingConfigValue(String),

    #[error("Source file not found: {}", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("No draft text found in {}", .0.display())]
    MissingDraft(PathBuf),

    #[error("Missing GH_TOKEN environment variable.")]
    MissingCredential,

    #[error("GitHub API {status}: {body}")]
    RemoteApi { status: u16, body: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Publish succeeded but no URL returned from GitHub.")]
    PublishIntegrity,

    #[error("failed to write log {}: {source}", path.display())]
    Log { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
}

pub type Result<T> = core::result::Result<T, BridgeError>;

impl BridgeError {
    /// The single line printed when a run fails.
    pub fn diagnostic(&self) -> String {
        let message = self.to_string();
        let words: Vec<&str> = message.split_whitespace().collect();
        format!("Error: {}", words.join(" "))
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingConfigValue(_) => 2,
            Self::MissingSourceFile(_) | Self::MissingDraft(_) | Self::Read { .. } => 3,
            Self::MissingCredential => 4,
            Self::RemoteApi { .. } | Self::Transport { .. } | Self::Decode { .. } => 5,
            Self::PublishIntegrity => 6,
            Self::Log { .. } => 7,
        }
    }
}
