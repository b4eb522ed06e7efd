//! Upsert-by-identity reconciliation
//!
//! Keeps exactly one comment from a designated author on a discussion: the first
//! comment by that author is rewritten in place, otherwise a new one is created.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::error::CommentError;
use crate::models::{Comment, DiscussionRef};
use crate::traits::CommentStore;

/// The remote step a reconcile run was performing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    List,
    Update,
    Create,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::List => "listing",
            Step::Update => "updating",
            Step::Create => "creating",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a reconcile run. The underlying message is kept verbatim.
#[derive(Error, Debug)]
#[error("{step} comments failed: {cause}")]
pub struct ReconcileError {
    pub step: Step,
    pub cause: CommentError,
}

/// The single mutation a successful run performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    Created(Comment),
    Updated(Comment),
}

impl Reconciled {
    pub fn action(&self) -> &'static str {
        match self {
            Reconciled::Created(_) => "created",
            Reconciled::Updated(_) => "updated",
        }
    }

    pub fn comment(&self) -> &Comment {
        match self {
            Reconciled::Created(c) | Reconciled::Updated(c) => c,
        }
    }
}

/// First comment authored by `identity`, in listed order.
///
/// Later comments by the same author are left alone.
pub fn find_managed_comment(comments: &[Comment], identity: u64) -> Option<&Comment> {
    comments.iter().find(|c| c.is_authored_by(identity))
}

pub struct CommentReconciler<'a> {
    store: &'a dyn CommentStore,
    identity: u64,
}

impl<'a> CommentReconciler<'a> {
    pub fn new(store: &'a dyn CommentStore, identity: u64) -> Self {
        Self { store, identity }
    }

    /// List the discussion's comments and return the managed one, if any
    pub fn locate(&self, discussion: &DiscussionRef) -> Result<Option<Comment>, ReconcileError> {
        let comments = self
            .store
            .list_comments(discussion)
            .map_err(|cause| ReconcileError {
                step: Step::List,
                cause,
            })?;
        debug!(
            discussion = %discussion,
            count = comments.len(),
            "listed comments"
        );
        Ok(find_managed_comment(&comments, self.identity).cloned())
    }

    /// Ensure the discussion carries one managed comment whose body is `body`
    pub fn reconcile(
        &self,
        discussion: &DiscussionRef,
        body: &str,
    ) -> Result<Reconciled, ReconcileError> {
        match self.locate(discussion)? {
            Some(existing) => {
                info!(discussion = %discussion, comment_id = existing.id, "updating managed comment");
                self.store
                    .update_comment(discussion, existing.id, body)
                    .map(Reconciled::Updated)
                    .map_err(|cause| ReconcileError {
                        step: Step::Update,
                        cause,
                    })
            }
            None => {
                info!(discussion = %discussion, identity = self.identity, "creating managed comment");
                self.store
                    .create_comment(discussion, body)
                    .map(Reconciled::Created)
                    .map_err(|cause| ReconcileError {
                        step: Step::Create,
                        cause,
                    })
            }
        }
    }
}
