//! Maps project ids to their bare repositories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use todo_core::repository::{Repository, RepositoryProvider};

use crate::gitdir::{is_bare_repo, repository_path};
use crate::repository::GitRepository;

/// Serves `<root>/<project_id>.git` for each project.
#[derive(Debug, Clone)]
pub struct GitRepositoryProvider {
    root: PathBuf,
    project_paths: HashMap<i64, String>,
}

impl GitRepositoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            project_paths: HashMap::new(),
        }
    }

    /// Registers a human-readable path for a project, used in full commit
    /// references.
    pub fn with_project_path(mut self, project_id: i64, path: impl Into<String>) -> Self {
        self.project_paths.insert(project_id, path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens the project's repository if it exists on disk.
    pub fn open(&self, project_id: i64) -> Option<GitRepository> {
        let path = repository_path(&self.root, project_id);
        if !is_bare_repo(&path) {
            debug!(project_id, path = %path.display(), "no repository for project");
            return None;
        }
        let repo = GitRepository::open(path).ok()?;
        Some(match self.project_paths.get(&project_id) {
            Some(project_path) => repo.with_project_path(project_path.clone()),
            None => repo,
        })
    }
}

impl RepositoryProvider for GitRepositoryProvider {
    fn repository(&self, project_id: i64) -> Option<Arc<dyn Repository>> {
        self.open(project_id)
            .map(|repo| Arc::new(repo) as Arc<dyn Repository>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitdir::init_bare;

    #[test]
    fn missing_repository_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let provider = GitRepositoryProvider::new(dir.path());
        assert!(provider.repository(1).is_none());
    }

    #[test]
    fn existing_repository_is_served() {
        let dir = tempfile::tempdir().unwrap();
        init_bare(&repository_path(dir.path(), 7)).unwrap();
        let provider = GitRepositoryProvider::new(dir.path()).with_project_path(7, "group/app");

        let repo = provider.open(7).unwrap();
        assert_eq!(repo.git_dir(), repository_path(dir.path(), 7));
        assert!(provider.repository(7).is_some());
        assert!(provider.repository(8).is_none());
    }
}
