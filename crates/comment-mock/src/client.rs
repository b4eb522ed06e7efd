//! Mock client implementing the CommentStore trait
//!
//! Keeps the discussion in memory and records every call instead of making HTTP requests.

use crate::scenario::{FailureSpec, Scenario, ScenarioError};
use chrono::{DateTime, Utc};
use comment_core::{Comment, CommentError, CommentStore, DiscussionRef, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Call log written next to the scenario file
pub const CALL_LOG_FILE_NAME: &str = "call_log.jsonl";

/// A mock client backed by an in-memory scenario
pub struct MockClient {
    /// Current comments, failures and author id
    state: Mutex<Scenario>,

    /// Calls made so far, in order
    calls: Mutex<Vec<CallLogEntry>>,

    /// Call log file writer
    log_writer: Mutex<Option<BufWriter<File>>>,
}

/// A single call log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,

    /// Method name
    pub method: String,

    /// Arguments passed
    pub args: BTreeMap<String, serde_json::Value>,

    /// Error message (if call failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Simulated status code, 0 for transport failures
    pub status: u16,
}

impl MockClient {
    /// Create a new MockClient from a scenario file, logging calls beside it
    pub fn new(scenario_path: impl AsRef<Path>) -> std::result::Result<Self, ScenarioError> {
        let scenario_path = scenario_path.as_ref();
        let scenario = Scenario::load(scenario_path)?;

        let log_path = Self::call_log_path(scenario_path);
        let log_writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok()
            .map(BufWriter::new);

        Ok(Self {
            state: Mutex::new(scenario),
            calls: Mutex::new(Vec::new()),
            log_writer: Mutex::new(log_writer),
        })
    }

    /// Create a MockClient from a scenario without a log file (for testing)
    pub fn from_scenario(scenario: Scenario) -> Self {
        Self {
            state: Mutex::new(scenario),
            calls: Mutex::new(Vec::new()),
            log_writer: Mutex::new(None),
        }
    }

    /// Create a MockClient seeded with comments
    pub fn from_comments(comments: Vec<Comment>) -> Self {
        Self::from_scenario(Scenario {
            comments,
            ..Scenario::default()
        })
    }

    /// Make every later call to `method` fail
    pub fn fail(self, method: &str, failure: FailureSpec) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method.to_string(), failure);
        self
    }

    /// Path of the call log belonging to a scenario file
    pub fn call_log_path(scenario_path: &Path) -> PathBuf {
        scenario_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(CALL_LOG_FILE_NAME)
    }

    /// Read a call log written by a previous run
    pub fn read_call_log(path: &Path) -> Vec<CallLogEntry> {
        let content = std::fs::read_to_string(path).unwrap_or_default();

        content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Calls recorded by this client
    pub fn calls(&self) -> Vec<CallLogEntry> {
        self.calls.lock().unwrap().clone()
    }

    /// Method names of the recorded calls, in order
    pub fn call_methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.method.clone())
            .collect()
    }

    /// Current comments on the mock discussion
    pub fn comments(&self) -> Vec<Comment> {
        self.state.lock().unwrap().comments.clone()
    }

    /// Record a call, returning the configured failure for `method` if there is one
    fn record(
        &self,
        method: &str,
        args: BTreeMap<String, serde_json::Value>,
    ) -> Result<()> {
        let failure = self.state.lock().unwrap().failures.get(method).cloned();

        let entry = CallLogEntry {
            timestamp: Utc::now(),
            method: method.to_string(),
            args,
            error: failure.as_ref().map(|f| f.message.clone()),
            status: failure.as_ref().map_or(200, FailureSpec::logged_status),
        };

        if let Ok(mut writer) = self.log_writer.lock() {
            if let Some(w) = writer.as_mut() {
                if let Ok(json) = serde_json::to_string(&entry) {
                    let _ = writeln!(w, "{}", json);
                    let _ = w.flush();
                }
            }
        }
        self.calls.lock().unwrap().push(entry);

        match failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

fn discussion_args(discussion: &DiscussionRef) -> BTreeMap<String, serde_json::Value> {
    [
        ("owner".to_string(), serde_json::json!(discussion.owner)),
        ("repo".to_string(), serde_json::json!(discussion.repo)),
        ("number".to_string(), serde_json::json!(discussion.number)),
    ]
    .into_iter()
    .collect()
}

impl CommentStore for MockClient {
    fn list_comments(&self, discussion: &DiscussionRef) -> Result<Vec<Comment>> {
        self.record("list_comments", discussion_args(discussion))?;
        Ok(self.comments())
    }

    fn update_comment(
        &self,
        discussion: &DiscussionRef,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment> {
        let mut args = discussion_args(discussion);
        args.insert("comment_id".to_string(), serde_json::json!(comment_id));
        args.insert("body".to_string(), serde_json::json!(body));
        self.record("update_comment", args)?;

        let mut state = self.state.lock().unwrap();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| CommentError::NotFound(format!("comment {}", comment_id)))?;
        comment.body = body.to_string();
        Ok(comment.clone())
    }

    fn create_comment(&self, discussion: &DiscussionRef, body: &str) -> Result<Comment> {
        let mut args = discussion_args(discussion);
        args.insert("body".to_string(), serde_json::json!(body));
        self.record("create_comment", args)?;

        let mut state = self.state.lock().unwrap();
        let comment = Comment {
            id: state.comments.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            author_id: Some(state.author_id),
            author_login: None,
            body: body.to_string(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comment_core::{CommentReconciler, Step, DEFAULT_IDENTITY};

    fn comment(id: u64, author: u64, body: &str) -> Comment {
        Comment {
            id,
            author_id: Some(author),
            author_login: None,
            body: body.to_string(),
        }
    }

    fn discussion() -> DiscussionRef {
        DiscussionRef::new("owner", "repo", 42)
    }

    #[test]
    fn test_create_path() {
        let client = MockClient::from_comments(vec![comment(1, 999, "x")]);

        let result = CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "Hello (sha123)")
            .unwrap();

        assert_eq!(result.action(), "created");
        assert_eq!(client.call_methods(), vec!["list_comments", "create_comment"]);
        let calls = client.calls();
        assert_eq!(calls[1].args["body"], serde_json::json!("Hello (sha123)"));
        assert_eq!(calls[1].args["number"], serde_json::json!(42));
    }

    #[test]
    fn test_update_path() {
        let client = MockClient::from_comments(vec![comment(1, DEFAULT_IDENTITY, "old")]);

        CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "Hello (sha456)")
            .unwrap();

        assert_eq!(client.call_methods(), vec!["list_comments", "update_comment"]);
        let calls = client.calls();
        assert_eq!(calls[1].args["comment_id"], serde_json::json!(1));
        assert_eq!(calls[1].args["body"], serde_json::json!("Hello (sha456)"));
        assert_eq!(client.comments()[0].body, "Hello (sha456)");
    }

    #[test]
    fn test_first_match_policy() {
        let client = MockClient::from_comments(vec![
            comment(1, DEFAULT_IDENTITY, "a"),
            comment(2, DEFAULT_IDENTITY, "b"),
        ]);

        CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "c")
            .unwrap();

        let comments = client.comments();
        assert_eq!(comments[0].body, "c");
        assert_eq!(comments[1].body, "b");
    }

    #[test]
    fn test_idempotent_upsert() {
        let client = MockClient::from_comments(vec![comment(5, 999, "human")]);
        let reconciler = CommentReconciler::new(&client, DEFAULT_IDENTITY);

        reconciler.reconcile(&discussion(), "status").unwrap();
        let after_first: Vec<_> = client
            .comments()
            .into_iter()
            .filter(|c| c.is_authored_by(DEFAULT_IDENTITY))
            .collect();
        assert_eq!(after_first.len(), 1);
        assert_eq!(after_first[0].id, 6);

        reconciler.reconcile(&discussion(), "status").unwrap();
        let after_second: Vec<_> = client
            .comments()
            .into_iter()
            .filter(|c| c.is_authored_by(DEFAULT_IDENTITY))
            .collect();
        assert_eq!(after_second, after_first);
        assert_eq!(
            client.call_methods(),
            vec!["list_comments", "create_comment", "list_comments", "update_comment"]
        );
    }

    #[test]
    fn test_list_failure_stops_before_mutation() {
        let client = MockClient::from_comments(Vec::new())
            .fail("list_comments", FailureSpec::transport("getaddrinfo ENOTFOUND"));

        let err = CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "body")
            .unwrap_err();

        assert_eq!(err.step, Step::List);
        assert!(err.to_string().contains("getaddrinfo ENOTFOUND"));
        assert_eq!(client.call_methods(), vec!["list_comments"]);
        assert_eq!(client.calls()[0].status, 0);
    }

    #[test]
    fn test_update_failure_leaves_body() {
        let client = MockClient::from_comments(vec![comment(1, DEFAULT_IDENTITY, "old")])
            .fail("update_comment", FailureSpec::status(404, "Not Found"));

        let err = CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "new")
            .unwrap_err();

        assert_eq!(err.step, Step::Update);
        assert_eq!(client.comments()[0].body, "old");
    }

    #[test]
    fn test_new_writes_call_log() {
        let dir = tempfile::tempdir().unwrap();
        let scenario_path = dir.path().join("scenario.toml");
        std::fs::write(
            &scenario_path,
            "[[comments]]\nid = 1\nauthor_id = 41898282\nbody = \"old\"\n",
        )
        .unwrap();

        let client = MockClient::new(&scenario_path).unwrap();
        CommentReconciler::new(&client, DEFAULT_IDENTITY)
            .reconcile(&discussion(), "new")
            .unwrap();
        drop(client);

        let log = MockClient::read_call_log(&MockClient::call_log_path(&scenario_path));
        let methods: Vec<_> = log.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["list_comments", "update_comment"]);
        assert!(log.iter().all(|e| e.status == 200 && e.error.is_none()));
    }
}
