//! Storage error types.

use todo_core::state::{State, TodoEvent, TransitionError};
use todo_core::validation::ValidationError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g., "todo", "issue").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The todo is not in a state the event can be applied to.
    #[error("todo {id} is {from}; cannot apply {event:?}")]
    InvalidTransition {
        /// The todo id.
        id: i64,
        /// State observed when the conditional update matched no row.
        from: State,
        /// The rejected event.
        event: TodoEvent,
    },

    /// Creation input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored row could not be mapped back to the domain model.
    #[error("corrupt {entity} row {id}: {reason}")]
    Corrupt {
        entity: String,
        id: String,
        reason: String,
    },

    /// The database is locked by another process.
    #[error("database locked: {0}")]
    DatabaseLocked(String),

    /// Failed to establish or maintain a database connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// A transaction operation failed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A schema migration failed.
    #[error("migration {name} failed: {reason}")]
    Migration {
        /// Name of the migration that failed.
        name: String,
        /// Underlying error description.
        reason: String,
    },

    /// A raw SQLite query error.
    #[error("query error: {0}")]
    Query(#[source] rusqlite::Error),
}

/// Convenience alias used throughout the storage crate.
pub type Result<T> = std::result::Result<T, StorageError>;

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, ref msg)
                if matches!(
                    code.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                Self::DatabaseLocked(msg.clone().unwrap_or_else(|| code.to_string()))
            }
            rusqlite::Error::FromSqlConversionFailure(idx, ty, source) => {
                match source.downcast::<CorruptRow>() {
                    Ok(row) => Self::Corrupt {
                        entity: row.entity.to_string(),
                        id: row.id.to_string(),
                        reason: row.reason,
                    },
                    Err(source) => {
                        Self::Query(rusqlite::Error::FromSqlConversionFailure(idx, ty, source))
                    }
                }
            }
            other => Self::Query(other),
        }
    }
}

/// Raised from row mappers so the conversion failure reaches callers as
/// [`StorageError::Corrupt`].
#[derive(Debug, thiserror::Error)]
#[error("corrupt {entity} row {id}: {reason}")]
pub(crate) struct CorruptRow {
    pub entity: &'static str,
    pub id: i64,
    pub reason: String,
}

impl StorageError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`StorageError::NotFound`] for the given entity kind and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a [`StorageError::Corrupt`] for a row that failed to map.
    pub fn corrupt(entity: impl Into<String>, id: impl ToString, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            entity: entity.into(),
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a [`StorageError::InvalidTransition`] for todo `id`.
    pub fn invalid_transition(id: i64, err: TransitionError) -> Self {
        Self::InvalidTransition {
            id,
            from: err.from,
            event: err.event,
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a [`StorageError::InvalidTransition`].
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = StorageError::not_found("todo", 42);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "todo not found: 42");
    }

    #[test]
    fn invalid_transition_message() {
        let err = StorageError::invalid_transition(
            7,
            TransitionError {
                from: State::Done,
                event: TodoEvent::Done,
            },
        );
        assert!(err.is_invalid_transition());
        assert_eq!(err.to_string(), "todo 7 is done; cannot apply Done");
    }

    #[test]
    fn validation_converts() {
        let err: StorageError = ValidationError::UserRequired.into();
        assert!(matches!(err, StorageError::Validation(ValidationError::UserRequired)));
    }

    #[test]
    fn busy_maps_to_locked() {
        let sqlite = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".into()),
        );
        let err = StorageError::from(sqlite);
        assert!(matches!(err, StorageError::DatabaseLocked(ref msg) if msg == "database is locked"));
    }
}
