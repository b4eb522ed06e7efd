use crate::error::Result;
use crate::models::{Comment, DiscussionRef};

/// Remote capability the reconciler depends on
///
/// Each backend (GitHub, the scenario mock) provides its own implementation.
/// Implementations perform exactly one remote call per method and never retry.
pub trait CommentStore: Send + Sync {
    /// List the comments attached to a discussion, in the order the platform returns them
    fn list_comments(&self, discussion: &DiscussionRef) -> Result<Vec<Comment>>;

    /// Replace the body of an existing comment
    fn update_comment(
        &self,
        discussion: &DiscussionRef,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment>;

    /// Attach a new comment to a discussion
    fn create_comment(&self, discussion: &DiscussionRef, body: &str) -> Result<Comment>;
}
