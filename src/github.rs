//! GitHub publication primitives.
//!
//! [`Forge`] is the seam between the publish decision logic and the remote
//! platform: [`GitHubClient`] talks to the REST API, tests use a fake.

mod client;

pub use client::GitHubClient;

use serde::Deserialize;

use crate::error::Result;

/// A discussion category as listed by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscussionCategory {
    pub id: u64,
    pub name: String,
}

/// Response of a create call. `html_url` may be missing on odd responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Created {
    pub html_url: Option<String>,
}

/// The remote operations a publish needs.
pub trait Forge {
    fn list_discussion_categories(&self, owner: &str, repo: &str)
        -> Result<Vec<DiscussionCategory>>;

    fn create_discussion(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        category_id: u64,
    ) -> Result<Created>;

    fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<Created>;
}
