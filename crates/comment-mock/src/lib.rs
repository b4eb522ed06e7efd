//! Mock comment store for sticky-comment testing
//!
//! This crate provides a mock implementation of the `CommentStore` trait that keeps
//! comments in memory instead of talking to GitHub. It's designed for:
//!
//! 1. **Integration Testing**: Run the binary end to end without network access
//! 2. **Reproducible Scenarios**: Seed a discussion and inject failures deterministically
//! 3. **Call Auditing**: Check exactly which remote calls a run performed
//!
//! # Usage
//!
//! Set the `STICKY_MOCK_FILE` environment variable to point to a scenario file:
//!
//! ```bash
//! STICKY_MOCK_FILE=./fixtures/update.toml sticky-comment --repo owner/repo --number 42
//! ```
//!
//! # Scenario Format
//!
//! ```toml
//! author_id = 41898282        # author assigned to created comments
//!
//! [[comments]]
//! id = 1
//! author_id = 41898282
//! body = "old"
//!
//! [failures.list_comments]    # optional, per method
//! message = "connection reset"  # no status: transport failure
//! ```
//!
//! Each call is appended to `call_log.jsonl` next to the scenario file.

mod client;
mod scenario;

pub use client::{CallLogEntry, MockClient, CALL_LOG_FILE_NAME};
pub use scenario::{FailureSpec, Scenario, ScenarioError};

/// Environment variable to enable mock mode
pub const MOCK_FILE_ENV: &str = "STICKY_MOCK_FILE";

/// Get the scenario file from environment, if set
pub fn get_mock_file() -> Option<std::path::PathBuf> {
    std::env::var(MOCK_FILE_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(std::path::PathBuf::from)
}
