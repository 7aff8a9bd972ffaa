//! Repository layout on disk.
//!
//! Each project owns one bare repository named `<project_id>.git` under a
//! common root directory.

use std::path::{Path, PathBuf};

use crate::commands::{Result, git_command};

/// Path of the bare repository for `project_id` under `root`.
pub fn repository_path(root: &Path, project_id: i64) -> PathBuf {
    root.join(format!("{project_id}.git"))
}

/// Check whether `path` looks like a bare git repository.
///
/// This is a purely filesystem-based check (`HEAD`, `objects/`, `refs/`);
/// it does not shell out to `git`.
pub fn is_bare_repo(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir() && path.join("refs").is_dir()
}

/// Creates an empty bare repository at `path` (parents included).
pub fn init_bare(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let cwd = path.parent().unwrap_or(Path::new("."));
    git_command(
        &["init", "--bare", "--quiet", &path.display().to_string()],
        cwd,
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_path() {
        assert_eq!(
            repository_path(Path::new("/srv/repos"), 42),
            PathBuf::from("/srv/repos/42.git")
        );
    }

    #[test]
    fn test_is_bare_repo() {
        let dir = tempfile::tempdir().unwrap();
        let path = repository_path(dir.path(), 1);
        assert!(!is_bare_repo(&path));

        init_bare(&path).unwrap();
        assert!(is_bare_repo(&path));
    }

    #[test]
    fn test_plain_directory_is_not_a_repo() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("2.git/objects")).unwrap();
        assert!(!is_bare_repo(&dir.path().join("2.git")));
    }

    #[test]
    fn test_init_bare_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/root/3.git");
        init_bare(&path).unwrap();
        assert!(is_bare_repo(&path));
    }
}
