//! Blocking REST client for the GitHub API.
//!
//! One request per operation. Any status of 300 or above is an error
//! carrying the status and response body; nothing is retried.

use std::env;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{Created, DiscussionCategory, Forge};
use crate::error::{BridgeError, Result};

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "GH_TOKEN";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("comm-bridge/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Authenticated GitHub REST client.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client using the token from [`TOKEN_ENV`].
    pub fn from_env(api_url: &str) -> Result<Self> {
        Self::new(env::var(TOKEN_ENV).ok(), api_url)
    }

    /// Create a client. A missing or empty token is an error.
    pub fn new(token: Option<String>, api_url: &str) -> Result<Self> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(BridgeError::MissingCredential)?;

        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BridgeError::Transport {
                url: api_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_url);
        tracing::debug!(%method, %url, "GitHub request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| BridgeError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        tracing::info!(%method, %url, status = status.as_u16(), "GitHub response");
        if status.as_u16() >= 300 {
            let body = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(BridgeError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }

        response.json().map_err(|e| BridgeError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl Forge for GitHubClient {
    fn list_discussion_categories(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<DiscussionCategory>> {
        self.request(
            Method::GET,
            &format!("/repos/{owner}/{repo}/discussions/categories"),
            None,
        )
    }

    fn create_discussion(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        category_id: u64,
    ) -> Result<Created> {
        let payload = json!({ "title": title, "body": body, "category_id": category_id });
        self.request(
            Method::POST,
            &format!("/repos/{owner}/{repo}/discussions"),
            Some(&payload),
        )
    }

    fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<Created> {
        let payload = json!({ "title": title, "body": body, "labels": labels });
        self.request(
            Method::POST,
            &format!("/repos/{owner}/{repo}/issues"),
            Some(&payload),
        )
    }
}
