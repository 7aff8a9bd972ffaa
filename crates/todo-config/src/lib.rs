//! Configuration management for the todo notification store.
//!
//! This crate handles loading and saving `.todos/config.yaml` files,
//! discovering `.todos/` directories in the filesystem, and providing
//! typed access to configuration values.

pub mod config;
pub mod todo_dir;

pub use config::{CONFIG_FILE_NAME, ConfigError, TodoConfig, load_config, save_config};
pub use todo_dir::{ensure_todo_dir, find_todo_dir, find_todo_dir_or_error};
