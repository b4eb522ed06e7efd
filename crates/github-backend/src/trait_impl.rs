//! Implementation of comment-core traits for GitHubClient

use comment_core::{Comment, CommentStore, DiscussionRef, Result};

use crate::client::GitHubClient;
use crate::convert::github_comment_to_core;

impl CommentStore for GitHubClient {
    fn list_comments(&self, discussion: &DiscussionRef) -> Result<Vec<Comment>> {
        let comments = self.list_issue_comments(&discussion.owner, &discussion.repo, discussion.number)?;
        Ok(comments.into_iter().map(github_comment_to_core).collect())
    }

    fn update_comment(
        &self,
        discussion: &DiscussionRef,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment> {
        let updated =
            self.update_issue_comment(&discussion.owner, &discussion.repo, comment_id, body)?;
        Ok(github_comment_to_core(updated))
    }

    fn create_comment(&self, discussion: &DiscussionRef, body: &str) -> Result<Comment> {
        let created = self.create_issue_comment(
            &discussion.owner,
            &discussion.repo,
            discussion.number,
            body,
        )?;
        Ok(github_comment_to_core(created))
    }
}
