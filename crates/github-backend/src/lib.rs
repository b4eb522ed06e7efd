pub mod client;
mod convert;
pub mod error;
pub mod models;
mod trait_impl;

#[cfg(test)]
mod client_tests;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use error::{GitHubError, Result};
pub use models::*;

// Re-export comment-core types for convenience
pub use comment_core::{CommentError, CommentStore};
