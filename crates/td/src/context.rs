//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the global flags every command handler sees
//! and knows how to open the store and service for the `.todos/` directory.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use tracing::debug;

use todo_config::{find_todo_dir, load_config};
use todo_git::GitRepositoryProvider;
use todo_service::{KeepAround, TodoService};
use todo_storage::SqliteStore;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Explicit `.todos/` directory from `--db`.
    pub db_path: Option<PathBuf>,

    /// Acting user id.
    pub user: Option<i64>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        Self {
            db_path: global.db.as_ref().map(PathBuf::from),
            user: global.user,
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }

    /// Returns the `.todos/` directory: `--db` if given, otherwise the
    /// nearest one above the current directory.
    pub fn resolve_todo_dir(&self) -> Option<PathBuf> {
        if let Some(ref p) = self.db_path {
            return Some(p.clone());
        }
        let cwd = env::current_dir().ok()?;
        find_todo_dir(&cwd)
    }

    /// The acting user, required by commands that read or create todos.
    pub fn require_user(&self) -> Result<i64> {
        self.user
            .context("no user given. Pass --user <id> or set TD_USER.")
    }

    /// Loads config, opens the database and wires the repositories.
    pub fn open(&self) -> Result<TodoService<SqliteStore>> {
        let todo_dir = self
            .resolve_todo_dir()
            .context("no .todos directory found. Run 'td init' to create one.")?;
        let config = load_config(&todo_dir)
            .with_context(|| format!("failed to load config from {}", todo_dir.display()))?;

        let db_path = config.database_path(&todo_dir);
        if !db_path.exists() {
            bail!(
                "no todo database found at {}\nHint: run 'td init' to create a database",
                db_path.display()
            );
        }
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open database: {}", db_path.display()))?;

        let provider = Arc::new(GitRepositoryProvider::new(
            config.repositories_root(&todo_dir),
        ));
        let keep_around = if config.keep_around.background {
            KeepAround::background(provider.clone())
        } else {
            KeepAround::inline(provider.clone())
        };
        debug!(todo_dir = %todo_dir.display(), ?keep_around, "opened todo directory");

        Ok(TodoService::new(Arc::new(store), provider, keep_around))
    }

    /// Log filter from the config of the discovered `.todos/` directory,
    /// if there is one and it loads.
    pub fn configured_log_filter(&self) -> Option<String> {
        let todo_dir = self.resolve_todo_dir()?;
        load_config(&todo_dir).ok().map(|config| config.log.filter)
    }
}
