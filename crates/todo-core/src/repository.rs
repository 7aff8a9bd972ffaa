//! The repository collaborator that serves commit targets.
//!
//! Commits are not stored with todos. A todo that targets a commit asks the
//! owning project's repository to keep the object alive and reads it back
//! live when the target is resolved.

use std::sync::Arc;

use crate::target::Commit;

/// Errors reported by a repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The commit id is not a plausible object id.
    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),

    /// The repository could not be reached or the command failed.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Git-level operations a project repository provides.
pub trait Repository: Send + Sync {
    /// Pins `sha` so garbage collection never prunes it.
    fn keep_around(&self, sha: &str) -> Result<(), RepositoryError>;

    /// Reads a commit. `Ok(None)` means the object does not exist (anymore).
    fn commit(&self, sha: &str) -> Result<Option<Commit>, RepositoryError>;
}

/// Maps a project to its repository.
pub trait RepositoryProvider: Send + Sync {
    /// Returns `None` when the project has no repository.
    fn repository(&self, project_id: i64) -> Option<Arc<dyn Repository>>;
}
