//! Model conversions from GitHub types to comment-core types

use comment_core::Comment;

use crate::models::GitHubComment;

/// Convert a GitHub issue comment to a comment-core Comment
pub fn github_comment_to_core(comment: GitHubComment) -> Comment {
    let (author_id, author_login) = match comment.user {
        Some(user) => (Some(user.id), Some(user.login)),
        None => (None, None),
    };

    Comment {
        id: comment.id,
        author_id,
        author_login,
        body: comment.body.unwrap_or_default(),
    }
}
