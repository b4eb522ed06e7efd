use std::time::Duration;

use comment_core::Credential;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("sticky-comment/", env!("CARGO_PKG_VERSION"));

/// GitHub REST API client
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(credential: &Credential) -> Self {
        Self::with_base_url(DEFAULT_API_URL, credential)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, credential: &Credential) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: credential.expose().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            path
        )
    }

    /// Attach credentials and the REST API media type to a request
    fn authorized<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        request
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }

    /// Turn non-2xx responses into typed errors, keeping GitHub's message
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();
        if response.status().is_success() {
            return Ok(response);
        }

        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|remaining| remaining.as_bytes() == b"0");
        if status == 403 && quota_exhausted {
            return Err(GitHubError::RateLimited);
        }

        let body = response.body_mut().read_to_string().unwrap_or_default();
        let message = error_message(status, body);

        Err(match status {
            401 => GitHubError::Unauthorized,
            404 => GitHubError::NotFound(message),
            _ => GitHubError::Api { status, message },
        })
    }

    // ==================== Comment Operations ====================

    /// List comments on an issue or pull request
    ///
    /// Sends no paging parameters, so GitHub returns its default first page.
    pub fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<GitHubComment>> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}/comments", number));
        debug!(%url, "GET issue comments");

        let response = self
            .authorized(self.agent.get(&url))
            .call()
            .map_err(GitHubError::Http)?;

        let comments: Vec<GitHubComment> = read_json(self.check_response(response)?)?;
        Ok(comments)
    }

    /// Replace the body of an existing comment
    pub fn update_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        body: &str,
    ) -> Result<GitHubComment> {
        let url = self.repo_url(owner, repo, &format!("/issues/comments/{}", comment_id));
        debug!(%url, "PATCH issue comment");

        let update = GitHubCommentBody {
            body: body.to_string(),
        };

        let response = self
            .authorized(self.agent.patch(&url))
            .header("Content-Type", "application/json")
            .send_json(&update)
            .map_err(GitHubError::Http)?;

        let updated: GitHubComment = read_json(self.check_response(response)?)?;
        Ok(updated)
    }

    /// Add a comment to an issue or pull request
    pub fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<GitHubComment> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}/comments", number));
        debug!(%url, "POST issue comment");

        let comment = GitHubCommentBody {
            body: body.to_string(),
        };

        let response = self
            .authorized(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .send_json(&comment)
            .map_err(GitHubError::Http)?;

        let created: GitHubComment = read_json(self.check_response(response)?)?;
        Ok(created)
    }
}

/// Decode a successful response body
///
/// Read failures stay transport errors; malformed JSON is a parse error.
fn read_json<T: DeserializeOwned>(mut response: ureq::http::Response<ureq::Body>) -> Result<T> {
    let text = response.body_mut().read_to_string()?;
    Ok(serde_json::from_str(&text)?)
}

/// The `message` field of a GitHub error document, else the raw body
fn error_message(status: u16, body: String) -> String {
    let documented = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|doc| doc.get("message")?.as_str().map(String::from));

    match documented {
        Some(message) => message,
        None if body.trim().is_empty() => format!("HTTP {}", status),
        None => body,
    }
}
