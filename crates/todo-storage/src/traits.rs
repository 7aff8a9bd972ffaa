//! Storage traits -- the public API for todo persistence.
//!
//! Consumers depend on these traits rather than on concrete implementations so
//! that alternative backends (mocks, proxies, etc.) can be substituted.

use todo_core::enums::TargetType;
use todo_core::filter::TodoFilter;
use todo_core::state::State;
use todo_core::target::{Issue, MergeRequest, Note};
use todo_core::todo::{NewTodo, Todo};

use crate::error::Result;

// ---------------------------------------------------------------------------
// View / helper types
// ---------------------------------------------------------------------------

/// A project label. Lower `priority` means more urgent; `None` means the
/// label is not prioritized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub priority: Option<i32>,
}

// ---------------------------------------------------------------------------
// TodoStorage
// ---------------------------------------------------------------------------

/// Durable storage for todo records.
pub trait TodoStorage: Send + Sync {
    /// Validates and inserts a todo in the `pending` state.
    fn create_todo(&self, new: &NewTodo) -> Result<Todo>;

    /// Retrieves a todo by id.
    fn get_todo(&self, id: i64) -> Result<Todo>;

    /// Moves a todo from `pending` to `done`.
    ///
    /// The state check and the write are a single conditional update, so
    /// of several concurrent callers exactly one succeeds; the others get
    /// [`StorageError::InvalidTransition`](crate::StorageError::InvalidTransition).
    fn mark_done(&self, id: i64) -> Result<Todo>;

    /// Marks the user's pending todos among `ids` as done (all of them when
    /// `ids` is empty). Returns the ids that were transitioned.
    fn mark_all_done(&self, user_id: i64, ids: &[i64]) -> Result<Vec<i64>>;

    /// Lists todos matching the filter, in the filter's order.
    fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;

    /// Counts a user's todos in the given state.
    fn count_todos(&self, user_id: i64, state: State) -> Result<i64>;
}

// ---------------------------------------------------------------------------
// EntityStorage
// ---------------------------------------------------------------------------

/// Mirrors of the entities todos point at.
///
/// Rows are keyed by the ids of the owning system, so writes are upserts.
pub trait EntityStorage: Send + Sync {
    fn upsert_issue(&self, issue: &Issue) -> Result<()>;
    fn get_issue(&self, id: i64) -> Result<Issue>;

    fn upsert_merge_request(&self, mr: &MergeRequest) -> Result<()>;
    fn get_merge_request(&self, id: i64) -> Result<MergeRequest>;

    fn upsert_note(&self, note: &Note) -> Result<()>;
    fn get_note(&self, id: i64) -> Result<Note>;

    /// Creates a project label and returns it with its assigned id.
    fn create_label(&self, project_id: i64, title: &str, priority: Option<i32>) -> Result<Label>;

    /// Changes (or clears) a label's priority.
    fn set_label_priority(&self, label_id: i64, priority: Option<i32>) -> Result<()>;

    /// Attaches a label to an issue or merge request.
    fn link_label(&self, label_id: i64, target_type: &TargetType, target_id: i64) -> Result<()>;

    /// Detaches a label.
    fn unlink_label(&self, label_id: i64, target_type: &TargetType, target_id: i64) -> Result<()>;

    /// Labels attached to a target, most urgent first.
    fn labels_for(&self, target_type: &TargetType, target_id: i64) -> Result<Vec<Label>>;
}

// ---------------------------------------------------------------------------
// LabelPriorityResolver
// ---------------------------------------------------------------------------

/// Answers "how urgent is this target" from its labels.
pub trait LabelPriorityResolver: Send + Sync {
    /// The minimal (most urgent) priority among the target's labels, or
    /// `None` when it has no prioritized label or its kind carries none.
    fn highest_label_priority(&self, target_type: &TargetType, target_id: i64)
    -> Result<Option<i32>>;
}
