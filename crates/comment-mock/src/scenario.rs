//! Scenario parsing
//!
//! A scenario seeds the discussion's comments and declares which calls fail.

use comment_core::{Comment, CommentError, DEFAULT_IDENTITY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Seed state for a mock discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Author id given to comments created during the run
    #[serde(default = "default_author_id")]
    pub author_id: u64,

    /// Existing comments, in the order `list_comments` returns them
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Failures keyed by `CommentStore` method name
    #[serde(default)]
    pub failures: HashMap<String, FailureSpec>,
}

fn default_author_id() -> u64 {
    DEFAULT_IDENTITY
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            author_id: DEFAULT_IDENTITY,
            comments: Vec::new(),
            failures: HashMap::new(),
        }
    }
}

/// A failure to return instead of performing the call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSpec {
    /// HTTP status to simulate. Without one the failure is a transport error.
    #[serde(default)]
    pub status: Option<u16>,

    pub message: String,
}

impl FailureSpec {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The error a real backend would surface for this failure
    pub fn to_error(&self) -> CommentError {
        match self.status {
            None => CommentError::Http(self.message.clone()),
            Some(401) => CommentError::Unauthorized,
            Some(404) => CommentError::NotFound(self.message.clone()),
            Some(status) => CommentError::Api {
                status,
                message: self.message.clone(),
            },
        }
    }

    /// Status recorded in the call log; transport failures have none, logged as 0
    pub fn logged_status(&self) -> u16 {
        self.status.unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Failed to parse scenario {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScenarioError::Io(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| ScenarioError::Parse(path.to_path_buf(), e))
    }
}
