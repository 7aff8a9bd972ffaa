//! Running the `git` binary.
//!
//! Every invocation goes through [`git_command`], which pins the locale and
//! disables credential prompts so output is stable and a missing remote
//! never blocks.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Errors from running git.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to execute git: {0}")]
    SpawnError(#[from] std::io::Error),

    /// Git ran and exited non-zero (`code` is `None` when killed by a signal).
    #[error("git {subcommand} failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        subcommand: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{0} is not a bare git repository")]
    NotARepo(String),

    #[error("unexpected git output: {0}")]
    UnexpectedOutput(String),
}

pub type Result<T> = std::result::Result<T, GitError>;

impl GitError {
    pub fn is_command_failed(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}

/// Runs `git <args>` in `cwd` and returns stdout without trailing
/// whitespace.
///
/// # Errors
///
/// [`GitError::SpawnError`] if git cannot be started (including a missing
/// `cwd`), [`GitError::CommandFailed`] on a non-zero exit.
///
/// # Examples
///
/// ```no_run
/// use todo_git::commands::git_command;
/// use std::path::Path;
///
/// let version = git_command(&["--version"], Path::new(".")).unwrap();
/// println!("{version}");
/// ```
pub fn git_command(args: &[&str], cwd: &Path) -> Result<String> {
    debug!(?args, cwd = %cwd.display(), "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            subcommand: subcommand(args).to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Runs git against the repository at `git_dir`.
///
/// `--git-dir` is passed explicitly so bare repositories work regardless of
/// the working directory or any `GIT_DIR` in the environment.
pub fn git_dir_command(git_dir: &Path, args: &[&str]) -> Result<String> {
    let git_dir_arg = format!("--git-dir={}", git_dir.display());
    let full_args: Vec<&str> = std::iter::once(git_dir_arg.as_str())
        .chain(args.iter().copied())
        .collect();
    git_command(&full_args, git_dir)
}

/// The first non-option argument, for error messages.
fn subcommand<'a>(args: &[&'a str]) -> &'a str {
    args.iter()
        .copied()
        .find(|a| !a.starts_with('-'))
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
