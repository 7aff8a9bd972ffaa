//! Filter type for todo list queries.

use crate::enums::{Action, SortOrder, TargetType};
use crate::state::State;

/// Selects one user's todos in one state, in an explicit order.
///
/// The optional fields narrow the result further; `None` means "any".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFilter {
    pub user_id: i64,
    pub state: State,
    pub order: SortOrder,

    pub project_id: Option<i64>,
    pub author_id: Option<i64>,
    pub action: Option<Action>,
    pub target_type: Option<TargetType>,

    pub limit: Option<u32>,
}

impl TodoFilter {
    pub fn new(user_id: i64, state: State, order: SortOrder) -> Self {
        Self {
            user_id,
            state,
            order,
            project_id: None,
            author_id: None,
            action: None,
            target_type: None,
            limit: None,
        }
    }

    pub fn project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = Some(target_type);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
