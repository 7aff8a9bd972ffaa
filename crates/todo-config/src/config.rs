//! Configuration types and loading.
//!
//! The main entry point is [`TodoConfig`], which represents the contents of
//! `.todos/config.yaml`. Configuration is loaded with [`load_config`] and
//! saved with [`save_config`].
//!
//! Values are layered: built-in defaults, then the YAML file, then
//! `TODOS_*` environment variables (`__` separates nested keys, e.g.
//! `TODOS_KEEP_AROUND__BACKGROUND=false`).

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file inside the `.todos/` directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "TODOS_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration could not be serialized to YAML.
    #[error("failed to serialize config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Layered extraction failed (bad YAML, wrong types, bad env value).
    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// The `.todos/` directory was not found.
    #[error("no .todos directory found (run 'td init' first)")]
    TodoDirNotFound,

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if no `.todos/` directory could be located.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TodoDirNotFound)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Database section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, relative to the `.todos/` directory unless absolute.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "todos.db".to_string()
}

/// Where project repositories live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoriesConfig {
    /// Directory holding `<project_id>.git` bare repositories, relative to
    /// the `.todos/` directory unless absolute.
    #[serde(default = "default_repositories_root")]
    pub root: String,
}

impl Default for RepositoriesConfig {
    fn default() -> Self {
        Self {
            root: default_repositories_root(),
        }
    }
}

fn default_repositories_root() -> String {
    "repositories".to_string()
}

/// Keep-around dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepAroundConfig {
    /// Run keep-around on a worker thread instead of the caller's. When
    /// false, commands wait for the git calls before returning.
    #[serde(default = "default_true")]
    pub background: bool,
}

impl Default for KeepAroundConfig {
    fn default() -> Self {
        Self {
            background: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when not verbose.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full configuration, as stored in `.todos/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TodoConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub repositories: RepositoriesConfig,

    #[serde(default, rename = "keep-around")]
    pub keep_around: KeepAroundConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl TodoConfig {
    /// Absolute database path for a config loaded from `todo_dir`.
    pub fn database_path(&self, todo_dir: &Path) -> PathBuf {
        resolve(todo_dir, &self.database.path)
    }

    /// Absolute repositories root for a config loaded from `todo_dir`.
    pub fn repositories_root(&self, todo_dir: &Path) -> PathBuf {
        resolve(todo_dir, &self.repositories.root)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid_value("database.path", "must not be empty"));
        }
        if self.repositories.root.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "repositories.root",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

fn resolve(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Environment provider: `TODOS_KEEP_AROUND__BACKGROUND` maps to
/// `keep-around.background`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .split("__")
        .map(|key| key.as_str().to_ascii_lowercase().replace('_', "-").into())
}

/// Load configuration for the `.todos/` directory at `todo_dir`.
///
/// A missing or empty `config.yaml` yields the defaults (still subject to
/// environment overrides).
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be
/// read, [`ConfigError::Extract`] if a layer holds invalid values, or
/// [`ConfigError::InvalidValue`] if validation fails.
pub fn load_config(todo_dir: &Path) -> Result<TodoConfig> {
    let config_path = todo_dir.join(CONFIG_FILE_NAME);
    let mut figment = Figment::from(Serialized::defaults(TodoConfig::default()));

    if config_path.is_file() {
        let content = std::fs::read_to_string(&config_path)?;
        if !content.trim().is_empty() {
            figment = figment.merge(Yaml::string(&content));
        }
    }

    let config: TodoConfig = figment.merge(env_provider()).extract()?;
    config.validate()?;
    Ok(config)
}

/// Write `config` to `todo_dir/config.yaml`, replacing any existing file.
pub fn save_config(todo_dir: &Path, config: &TodoConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(todo_dir.join(CONFIG_FILE_NAME), yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
