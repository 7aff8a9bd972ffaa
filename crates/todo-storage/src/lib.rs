//! Storage backend for the todo notification store.
//!
//! Provides the [`TodoStorage`], [`EntityStorage`] and
//! [`LabelPriorityResolver`] traits and a SQLite implementation
//! ([`SqliteStore`]).

pub mod error;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::{EntityStorage, Label, LabelPriorityResolver, TodoStorage};

// ---------------------------------------------------------------------------
// Trait implementations for SqliteStore
// ---------------------------------------------------------------------------

use todo_core::enums::TargetType;
use todo_core::filter::TodoFilter;
use todo_core::state::State;
use todo_core::target::{Issue, MergeRequest, Note};
use todo_core::todo::{NewTodo, Todo};

use crate::error::Result;

impl TodoStorage for SqliteStore {
    fn create_todo(&self, new: &NewTodo) -> Result<Todo> {
        self.create_todo_impl(new)
    }

    fn get_todo(&self, id: i64) -> Result<Todo> {
        self.get_todo_impl(id)
    }

    fn mark_done(&self, id: i64) -> Result<Todo> {
        self.mark_done_impl(id)
    }

    fn mark_all_done(&self, user_id: i64, ids: &[i64]) -> Result<Vec<i64>> {
        self.mark_all_done_impl(user_id, ids)
    }

    fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        self.list_todos_impl(filter)
    }

    fn count_todos(&self, user_id: i64, state: State) -> Result<i64> {
        self.count_todos_impl(user_id, state)
    }
}

impl EntityStorage for SqliteStore {
    fn upsert_issue(&self, issue: &Issue) -> Result<()> {
        self.upsert_issue_impl(issue)
    }

    fn get_issue(&self, id: i64) -> Result<Issue> {
        self.get_issue_impl(id)
    }

    fn upsert_merge_request(&self, mr: &MergeRequest) -> Result<()> {
        self.upsert_merge_request_impl(mr)
    }

    fn get_merge_request(&self, id: i64) -> Result<MergeRequest> {
        self.get_merge_request_impl(id)
    }

    fn upsert_note(&self, note: &Note) -> Result<()> {
        self.upsert_note_impl(note)
    }

    fn get_note(&self, id: i64) -> Result<Note> {
        self.get_note_impl(id)
    }

    fn create_label(&self, project_id: i64, title: &str, priority: Option<i32>) -> Result<Label> {
        self.create_label_impl(project_id, title, priority)
    }

    fn set_label_priority(&self, label_id: i64, priority: Option<i32>) -> Result<()> {
        self.set_label_priority_impl(label_id, priority)
    }

    fn link_label(&self, label_id: i64, target_type: &TargetType, target_id: i64) -> Result<()> {
        self.link_label_impl(label_id, target_type, target_id)
    }

    fn unlink_label(&self, label_id: i64, target_type: &TargetType, target_id: i64) -> Result<()> {
        self.unlink_label_impl(label_id, target_type, target_id)
    }

    fn labels_for(&self, target_type: &TargetType, target_id: i64) -> Result<Vec<Label>> {
        self.labels_for_impl(target_type, target_id)
    }
}

impl LabelPriorityResolver for SqliteStore {
    fn highest_label_priority(
        &self,
        target_type: &TargetType,
        target_id: i64,
    ) -> Result<Option<i32>> {
        self.highest_label_priority_impl(target_type, target_id)
    }
}
