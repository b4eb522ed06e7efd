pub mod credential;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod traits;

pub use credential::{Credential, CredentialError};
pub use error::{CommentError, Result};
pub use models::*;
pub use reconcile::{find_managed_comment, CommentReconciler, ReconcileError, Reconciled, Step};
pub use traits::CommentStore;
