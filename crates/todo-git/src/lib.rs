//! Git integration for the todo notification store.
//!
//! Commit targets are served from bare repositories on disk. This crate
//! wraps the `git` binary and implements the repository collaborator
//! traits from `todo-core` on top of it.

pub mod commands;
pub mod gitdir;
pub mod provider;
pub mod repository;

pub use commands::GitError;
pub use provider::GitRepositoryProvider;
pub use repository::GitRepository;
