use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CommentError, Result};

/// Account id of `github-actions[bot]`, the author whose comments are managed by default
pub const DEFAULT_IDENTITY: u64 = 41898282;

/// A pull request or issue thread that can hold comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl DiscussionRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Build a reference from an `owner/repo` string
    pub fn parse_repository(repository: &str, number: u64) -> Result<Self> {
        match repository.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo, number))
            }
            _ => Err(CommentError::InvalidInput(format!(
                "Invalid repository '{}', expected owner/repo",
                repository
            ))),
        }
    }
}

impl fmt::Display for DiscussionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// A comment as seen by the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// `None` for comments whose author account no longer exists
    pub author_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_login: Option<String>,
    pub body: String,
}

impl Comment {
    pub fn is_authored_by(&self, identity: u64) -> bool {
        self.author_id == Some(identity)
    }
}
