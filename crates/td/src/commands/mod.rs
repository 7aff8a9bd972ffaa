//! Command handlers, one module per subcommand.

pub mod count;
pub mod create;
pub mod done;
pub mod init;
pub mod issue;
pub mod label;
pub mod list;
pub mod mr;
pub mod note;
pub mod show;

use anyhow::{Result, bail};

use todo_core::todo::Todo;
use todo_service::TodoService;
use todo_storage::SqliteStore;

use crate::output::TodoView;

/// Builds the display view of a todo, resolving its target.
pub(crate) fn todo_view(service: &TodoService<SqliteStore>, todo: &Todo) -> Result<TodoView> {
    let reference = service.target_reference(todo)?;
    let body = service.display_body(todo)?;
    Ok(TodoView::new(todo, reference, body))
}

/// Loads a todo owned by `user`. Todos of other users are reported as
/// missing.
pub(crate) fn owned_todo(service: &TodoService<SqliteStore>, user: i64, id: i64) -> Result<Todo> {
    let todo = service.get(id)?;
    if todo.user_id != user {
        bail!("todo not found: {id}");
    }
    Ok(todo)
}
