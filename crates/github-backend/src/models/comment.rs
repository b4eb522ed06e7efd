use serde::{Deserialize, Serialize};

use super::user::GitHubUser;

/// GitHub issue comment
///
/// Pull request conversation comments are issue comments on the GitHub API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    /// Absent for comments whose author account was deleted
    pub user: Option<GitHubUser>,
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating or editing a comment
#[derive(Debug, Clone, Serialize)]
pub struct GitHubCommentBody {
    pub body: String,
}
