//! `td init` -- initialize a todo directory in the current directory.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use todo_config::{CONFIG_FILE_NAME, TodoConfig, ensure_todo_dir, load_config, save_config};
use todo_storage::SqliteStore;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Default gitignore content for the `.todos` directory.
const GITIGNORE_CONTENT: &str = r#"# Todo database files
*.db
*.db-journal
*.db-wal
*.db-shm

# Project repositories
repositories/
"#;

/// Execute the `td init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let todo_dir = match ctx.db_path {
        Some(ref p) => {
            fs::create_dir_all(p)
                .with_context(|| format!("failed to create directory: {}", p.display()))?;
            p.clone()
        }
        None => {
            let cwd = env::current_dir().context("failed to get current directory")?;
            ensure_todo_dir(&cwd)
                .with_context(|| format!("failed to create .todos in {}", cwd.display()))?
        }
    };

    let config_path = todo_dir.join(CONFIG_FILE_NAME);
    if args.force || !config_path.exists() {
        save_config(&todo_dir, &TodoConfig::default())
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }
    let config = load_config(&todo_dir)
        .with_context(|| format!("failed to load config from {}", todo_dir.display()))?;

    let db_path = config.database_path(&todo_dir);
    if db_path.exists() {
        if !args.force {
            bail!(
                "Found existing database in {}\n\n\
                This directory is already initialized.\n\n\
                Use --force to re-initialize (data loss warning).",
                todo_dir.display()
            );
        }
        remove_database(&db_path)?;
    }

    let gitignore_path = todo_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE_CONTENT).with_context(|| {
            format!("failed to create .gitignore: {}", gitignore_path.display())
        })?;
    }

    let repositories = config.repositories_root(&todo_dir);
    fs::create_dir_all(&repositories)
        .with_context(|| format!("failed to create directory: {}", repositories.display()))?;

    SqliteStore::open(&db_path)
        .with_context(|| format!("failed to create database: {}", db_path.display()))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "todo_dir": todo_dir.display().to_string(),
            "database": db_path.display().to_string(),
            "repositories": repositories.display().to_string(),
        }));
    } else if !ctx.quiet {
        println!("Initialized todo directory at {}", todo_dir.display());
    }
    Ok(())
}

/// Deletes the database together with its WAL side files.
fn remove_database(db_path: &Path) -> Result<()> {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(suffix);
        let path = Path::new(&name);
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
    }
    Ok(())
}
