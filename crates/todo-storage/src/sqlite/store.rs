//! [`SqliteStore`] -- SQLite-backed storage implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::sqlite::schema::{CURRENT_SCHEMA_VERSION, SCHEMA_STATEMENTS};

/// SQLite-backed implementation of the storage traits.
///
/// Every operation holds the connection lock for its whole duration, which
/// is what makes the conditional state update atomic with respect to other
/// callers in the process. Other processes are serialized by SQLite itself.
pub struct SqliteStore {
    pub(crate) conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path` and brings its schema
    /// up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening todo database");

        let conn = Connection::open(path).map_err(|e| {
            StorageError::Connection(format!("failed to open {}: {e}", path.display()))
        })?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory todo database");
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Connection(format!("failed to open in-memory database: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        configure(&conn)?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// The schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        user_version(&*self.lock_conn()?)
    }

    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Connection(format!("mutex poisoned: {e}")))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

/// WAL journal, enforced foreign keys, and a busy timeout so concurrent
/// writers from other processes wait instead of failing at once.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| StorageError::Connection(format!("failed to set pragmas: {e}")))
}

fn user_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Creates the schema on an empty database and records its version.
///
/// A database written by a newer build is refused rather than read with a
/// schema this build does not know.
fn migrate(conn: &Connection) -> Result<()> {
    let version = user_version(conn)?;
    if version == CURRENT_SCHEMA_VERSION {
        debug!(version, "schema up to date");
        return Ok(());
    }
    if version > CURRENT_SCHEMA_VERSION {
        return Err(StorageError::Migration {
            name: "schema".to_string(),
            reason: format!(
                "database schema version {version} is newer than supported version {CURRENT_SCHEMA_VERSION}"
            ),
        });
    }

    let tx = conn.unchecked_transaction()?;
    for stmt in SCHEMA_STATEMENTS {
        tx.execute_batch(stmt)
            .map_err(|e| migration_error("schema", &e))?;
    }
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .map_err(|e| migration_error("user_version", &e))?;
    tx.commit()?;

    info!(version = CURRENT_SCHEMA_VERSION, "schema created");
    Ok(())
}

fn migration_error(name: &str, err: &rusqlite::Error) -> StorageError {
    StorageError::Migration {
        name: name.to_string(),
        reason: err.to_string(),
    }
}
