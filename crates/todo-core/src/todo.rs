//! The todo record and its creation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Action, TargetType};
use crate::state::State;

/// Reference to the subject of a todo.
///
/// Stored entities are addressed by kind and id; commits by object id,
/// because they live in the repository rather than in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetRef {
    Entity { target_type: TargetType, id: i64 },
    Commit { sha: String },
}

impl TargetRef {
    pub fn issue(id: i64) -> Self {
        Self::Entity {
            target_type: TargetType::Issue,
            id,
        }
    }

    pub fn merge_request(id: i64) -> Self {
        Self::Entity {
            target_type: TargetType::MergeRequest,
            id,
        }
    }

    pub fn commit(sha: impl Into<String>) -> Self {
        Self::Commit { sha: sha.into() }
    }

    pub fn target_type(&self) -> TargetType {
        match self {
            Self::Entity { target_type, .. } => target_type.clone(),
            Self::Commit { .. } => TargetType::Commit,
        }
    }

    /// Stored entity id, `None` for commits.
    pub fn target_id(&self) -> Option<i64> {
        match self {
            Self::Entity { id, .. } => Some(*id),
            Self::Commit { .. } => None,
        }
    }

    /// Commit object id, `None` for stored entities.
    pub fn commit_id(&self) -> Option<&str> {
        match self {
            Self::Entity { .. } => None,
            Self::Commit { sha } => Some(sha),
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Commit { .. })
    }
}

/// A pending or handled action item for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub action: Action,
    pub author_id: Option<i64>,
    pub user_id: i64,
    pub project_id: i64,
    pub target: TargetRef,
    pub note_id: Option<i64>,
    pub state: State,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Returns `true` when the target is a commit.
    pub fn is_for_commit(&self) -> bool {
        self.target.is_commit()
    }

    pub fn is_build_failed(&self) -> bool {
        self.action == Action::BuildFailed
    }

    pub fn is_pending(&self) -> bool {
        self.state == State::Pending
    }

    /// Symbolic name of the action (`assigned`, `build_failed`, ...).
    pub fn action_name(&self) -> &'static str {
        self.action.name()
    }
}

/// Input for creating a todo.
///
/// Fields mirror what an event handler has at hand, so any of them may be
/// missing; [`crate::validation::validate`] decides whether the input forms
/// a valid todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub action: Option<Action>,
    pub author_id: Option<i64>,
    pub user_id: Option<i64>,
    pub project_id: Option<i64>,
    pub target_type: Option<TargetType>,
    pub target_id: Option<i64>,
    pub commit_id: Option<String>,
    pub note_id: Option<i64>,
    /// Overrides the creation timestamp (imports, tests).
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// Starts a builder for the given action.
    pub fn builder(action: Action) -> NewTodoBuilder {
        NewTodoBuilder {
            todo: NewTodo {
                action: Some(action),
                ..Default::default()
            },
        }
    }

    /// Returns `true` when the target type is `Commit`.
    pub fn is_for_commit(&self) -> bool {
        self.target_type == Some(TargetType::Commit)
    }
}

/// Fluent construction of a [`NewTodo`].
#[derive(Debug, Clone)]
pub struct NewTodoBuilder {
    todo: NewTodo,
}

impl NewTodoBuilder {
    pub fn user(mut self, user_id: i64) -> Self {
        self.todo.user_id = Some(user_id);
        self
    }

    pub fn author(mut self, author_id: i64) -> Self {
        self.todo.author_id = Some(author_id);
        self
    }

    pub fn project(mut self, project_id: i64) -> Self {
        self.todo.project_id = Some(project_id);
        self
    }

    /// Points the todo at a stored entity.
    pub fn target(mut self, target_type: TargetType, target_id: i64) -> Self {
        self.todo.target_type = Some(target_type);
        self.todo.target_id = Some(target_id);
        self
    }

    pub fn issue(self, issue_id: i64) -> Self {
        self.target(TargetType::Issue, issue_id)
    }

    pub fn merge_request(self, merge_request_id: i64) -> Self {
        self.target(TargetType::MergeRequest, merge_request_id)
    }

    /// Points the todo at a commit.
    pub fn commit(mut self, sha: impl Into<String>) -> Self {
        self.todo.target_type = Some(TargetType::Commit);
        self.todo.commit_id = Some(sha.into());
        self
    }

    /// Applies a ready-made target reference.
    pub fn target_ref(self, target: TargetRef) -> Self {
        match target {
            TargetRef::Entity { target_type, id } => self.target(target_type, id),
            TargetRef::Commit { sha } => self.commit(sha),
        }
    }

    pub fn note(mut self, note_id: i64) -> Self {
        self.todo.note_id = Some(note_id);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.todo.created_at = Some(at);
        self
    }

    pub fn build(self) -> NewTodo {
        self.todo
    }
}
