//! Service-level errors.

use todo_core::state::State;
use todo_core::validation::ValidationError;
use todo_storage::StorageError;

/// Errors returned by [`TodoService`](crate::TodoService).
///
/// Caller mistakes are lifted out of [`StorageError`] into their own
/// variants; everything else is passed through as [`TodoError::Storage`].
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("invalid todo: {0}")]
    Validation(#[from] ValidationError),

    #[error("todo {id} is already {from}")]
    InvalidTransition { id: i64, from: State },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error(transparent)]
    Storage(StorageError),
}

pub type Result<T> = std::result::Result<T, TodoError>;

impl From<StorageError> for TodoError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => Self::Validation(e),
            StorageError::InvalidTransition { id, from, .. } => Self::InvalidTransition { id, from },
            StorageError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Storage(other),
        }
    }
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
