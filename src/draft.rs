//! Draft extraction and title derivation.
//!
//! The source document is free-form Markdown. The publishable text lives
//! under a `Draft` heading (depth 1–3) and runs until the next heading of
//! depth 1–3. Documents without one fall back to their first paragraph.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BridgeError, Result};

/// Default maximum title length, in characters.
pub const TITLE_LIMIT: usize = 80;

/// Title used when the draft has no usable first line.
const FALLBACK_TITLE: &str = "Update";

/// Lowercased prefix of the source document's own title paragraph.
const DOCUMENT_TITLE_PREFIX: &str = "# external communication module";

static DRAFT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,3}\s*Draft\s*\n([\s\S]*?)(?:\n#{1,3}\s|\z)")
        .expect("draft section pattern is valid")
});

/// The publishable text of one run. Never empty, always trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    body: String,
}

impl Draft {
    #[cfg(test)]
    pub(crate) fn from_body(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Title for this draft, bounded by [`TITLE_LIMIT`].
    pub fn title(&self) -> String {
        derive_title(&self.body, TITLE_LIMIT)
    }
}

/// Read the source document at `path` and extract its draft.
pub fn read_draft(path: &Path) -> Result<Draft> {
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(BridgeError::MissingSourceFile(path.to_path_buf()));
        }
        Err(source) => {
            return Err(BridgeError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let markdown = raw.replace("\r\n", "\n");
    let body = extract_draft(&markdown)
        .ok_or_else(|| BridgeError::MissingDraft(path.to_path_buf()))?;
    tracing::info!(path = %path.display(), chars = body.chars().count(), "extracted draft");
    Ok(Draft { body })
}

/// Extract the draft text from a Markdown document.
///
/// Returns `None` when neither the `Draft` section nor any paragraph
/// other than the document title has content.
pub fn extract_draft(markdown: &str) -> Option<String> {
    if let Some(section) = DRAFT_SECTION.captures(markdown).and_then(|c| c.get(1)) {
        let text = section.as_str().trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    markdown
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty() && !block.to_lowercase().starts_with(DOCUMENT_TITLE_PREFIX))
        .map(str::to_string)
}

/// Title from the first line of `body`, at most `limit` characters.
///
/// Longer lines are cut to `limit - 1` characters followed by `…`.
pub fn derive_title(body: &str, limit: usize) -> String {
    let first = body.trim().lines().next().unwrap_or(FALLBACK_TITLE);
    if first.chars().count() > limit {
        let mut title: String = first.chars().take(limit.saturating_sub(1)).collect();
        title.push('…');
        title
    } else {
        first.to_string()
    }
}
