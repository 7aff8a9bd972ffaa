//! [`GitRepository`] -- a bare repository serving commit targets.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use todo_core::repository::{Repository, RepositoryError};
use todo_core::target::Commit;

use crate::commands::{GitError, Result, git_dir_command};
use crate::gitdir::is_bare_repo;

/// Namespace of the refs that pin commits referenced by todos.
pub const KEEP_AROUND_NAMESPACE: &str = "refs/keep-around";

/// Field separator used in `git show --format`.
const FIELD_SEP: char = '\0';

/// Returns `true` for a plausible abbreviated or full hex object id.
pub fn is_valid_sha(sha: &str) -> bool {
    (7..=64).contains(&sha.len()) && sha.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The ref that keeps `sha` reachable.
pub fn keep_around_ref(sha: &str) -> String {
    format!("{KEEP_AROUND_NAMESPACE}/{sha}")
}

/// A project's bare repository on disk.
#[derive(Debug, Clone)]
pub struct GitRepository {
    git_dir: PathBuf,
    project_path: String,
}

impl GitRepository {
    /// Opens the bare repository at `git_dir`.
    pub fn open(git_dir: impl Into<PathBuf>) -> Result<Self> {
        let git_dir = git_dir.into();
        if !is_bare_repo(&git_dir) {
            return Err(GitError::NotARepo(git_dir.display().to_string()));
        }
        Ok(Self {
            git_dir,
            project_path: String::new(),
        })
    }

    /// Sets the project path used in full commit references.
    pub fn with_project_path(mut self, project_path: impl Into<String>) -> Self {
        self.project_path = project_path.into();
        self
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Expands `sha` to the full id of an existing commit, or `None` if the
    /// repository has no such commit.
    pub fn resolve_commit(&self, sha: &str) -> Result<Option<String>> {
        let spec = format!("{sha}^{{commit}}");
        match git_dir_command(&self.git_dir, &["rev-parse", "--verify", "--quiet", &spec]) {
            Ok(full) => Ok(Some(full)),
            Err(e) if e.is_command_failed() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates `refs/keep-around/<sha>` for an existing commit.
    ///
    /// Returns `false` without touching refs when the commit does not exist.
    pub fn pin_commit(&self, sha: &str) -> Result<bool> {
        let Some(full) = self.resolve_commit(sha)? else {
            debug!(sha, git_dir = %self.git_dir.display(), "commit missing, nothing to keep around");
            return Ok(false);
        };
        let ref_name = keep_around_ref(&full);
        git_dir_command(&self.git_dir, &["update-ref", &ref_name, &full])?;
        debug!(%ref_name, "keep-around ref written");
        Ok(true)
    }

    /// Reads a commit's metadata, or `None` if it does not exist.
    pub fn read_commit(&self, sha: &str) -> Result<Option<Commit>> {
        let Some(full) = self.resolve_commit(sha)? else {
            return Ok(None);
        };
        let out = git_dir_command(
            &self.git_dir,
            &["show", "-s", "--format=%H%x00%an%x00%ae%x00%aI%x00%B", &full],
        )?;
        parse_commit(&out, &self.project_path).map(Some)
    }
}

/// Parses the NUL-separated `git show` output produced by [`GitRepository::read_commit`].
fn parse_commit(out: &str, project_path: &str) -> Result<Commit> {
    let mut fields = out.splitn(5, FIELD_SEP);
    let (Some(id), Some(author_name), Some(author_email), Some(date), Some(message)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Err(GitError::UnexpectedOutput(out.to_string()));
    };

    let authored_at = DateTime::parse_from_rfc3339(date)
        .map_err(|e| GitError::UnexpectedOutput(format!("bad author date {date:?}: {e}")))?
        .with_timezone(&Utc);
    let message = message.trim_end().to_string();
    let title = message.lines().next().unwrap_or_default().to_string();

    Ok(Commit {
        id: id.to_string(),
        title,
        message,
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        authored_at,
        project_path: project_path.to_string(),
    })
}

fn unavailable(err: GitError) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

impl Repository for GitRepository {
    fn keep_around(&self, sha: &str) -> std::result::Result<(), RepositoryError> {
        if !is_valid_sha(sha) {
            return Err(RepositoryError::InvalidCommitId(sha.to_string()));
        }
        self.pin_commit(sha).map(|_| ()).map_err(unavailable)
    }

    fn commit(&self, sha: &str) -> std::result::Result<Option<Commit>, RepositoryError> {
        if !is_valid_sha(sha) {
            return Err(RepositoryError::InvalidCommitId(sha.to_string()));
        }
        self.read_commit(sha).map_err(unavailable)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
