//! Discovery and management of the `.todos/` directory.
//!
//! The `.todos/` directory holds the database and configuration. This
//! module finds it by walking up the directory tree and creates it when
//! initializing.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// The name of the metadata directory.
pub const TODO_DIR_NAME: &str = ".todos";

/// The name of the environment variable that can override the directory.
pub const TODO_DIR_ENV: &str = "TODOS_DIR";

/// Walk up the directory tree from `start` looking for a `.todos/` directory.
///
/// The `TODOS_DIR` environment variable is checked first (highest priority).
/// Returns `None` if the filesystem root is reached without finding one.
pub fn find_todo_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(TODO_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    let mut current = start.as_path();
    loop {
        let candidate = current.join(TODO_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}

/// Like [`find_todo_dir`] but returns [`ConfigError::TodoDirNotFound`]
/// instead of `None`.
pub fn find_todo_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_todo_dir(start).ok_or(ConfigError::TodoDirNotFound)
}

/// Ensure a `.todos/` directory exists at the given path.
///
/// If `path` itself is not called `.todos`, a `.todos/` subdirectory is
/// created under it. Returns the path to the `.todos/` directory.
pub fn ensure_todo_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let todo_dir = if path.ends_with(TODO_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(TODO_DIR_NAME)
    };

    std::fs::create_dir_all(&todo_dir)?;
    Ok(todo_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
