//! Publish decision: discussion, issue, or issue as a fallback.
//!
//! Single pass. In discussion mode the configured category is looked up
//! case-insensitively; when the repository has no such category the draft
//! is published as an issue instead.

use crate::config::{Mode, Settings};
use crate::draft::Draft;
use crate::error::{BridgeError, Result};
use crate::github::Forge;

/// Where a draft ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Human-readable channel label, recorded in the log.
    pub channel: String,
    pub url: String,
}

/// Publish `draft` according to `settings`.
pub fn publish(forge: &impl Forge, settings: &Settings, draft: &Draft) -> Result<PublishResult> {
    let (owner, repo) = settings.owner_and_repo()?;
    let title = draft.title();
    let body = draft.body();

    let (created, channel) = match settings.mode {
        Mode::Discussion => {
            let wanted = settings.discussion_category.to_lowercase();
            let category = forge
                .list_discussion_categories(owner, repo)?
                .into_iter()
                .find(|c| c.name.to_lowercase() == wanted);

            if let Some(category) = category {
                tracing::info!(category = %category.name, id = category.id, "creating discussion");
                let created = forge.create_discussion(owner, repo, &title, body, category.id)?;
                (created, format!("Discussion ({})", settings.discussion_category))
            } else {
                tracing::warn!(
                    category = %settings.discussion_category,
                    "discussion category not found, falling back to issue"
                );
                let created =
                    forge.create_issue(owner, repo, &title, body, &settings.issue_labels)?;
                (created, "Issue (fallback)".to_string())
            }
        }
        Mode::Issue => {
            tracing::info!(labels = ?settings.issue_labels, "creating issue");
            let created = forge.create_issue(owner, repo, &title, body, &settings.issue_labels)?;
            (created, "Issue".to_string())
        }
    };

    let url = created
        .html_url
        .filter(|u| !u.is_empty())
        .ok_or(BridgeError::PublishIntegrity)?;

    Ok(PublishResult { channel, url })
}
