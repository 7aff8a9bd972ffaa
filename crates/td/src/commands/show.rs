//! `td show` -- show a todo with its resolved target.

use anyhow::Result;

use todo_core::todo::{TargetRef, Todo};
use todo_service::TodoService;
use todo_storage::{EntityStorage, SqliteStore};

use crate::cli::ShowArgs;
use crate::commands::{owned_todo, todo_view};
use crate::context::RuntimeContext;
use crate::output::{format_todo_detail, output_json};

/// Execute the `td show` command.
pub fn run(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let user = ctx.require_user()?;
    let service = ctx.open()?;

    let todo = owned_todo(&service, user, args.id)?;
    let view = todo_view(&service, &todo)?.with_labels(label_titles(&service, &todo)?);

    if ctx.json {
        output_json(&view);
    } else {
        println!("{}", format_todo_detail(&view));
    }
    Ok(())
}

/// Titles of the labels on an issue or merge request target, most urgent
/// first. Other targets carry none.
fn label_titles(service: &TodoService<SqliteStore>, todo: &Todo) -> Result<Vec<String>> {
    let TargetRef::Entity { target_type, id } = &todo.target else {
        return Ok(Vec::new());
    };
    if !target_type.has_label_priority() {
        return Ok(Vec::new());
    }
    let labels = service.store().labels_for(target_type, *id)?;
    Ok(labels
        .into_iter()
        .map(|label| match label.priority {
            Some(p) => format!("{} (P{p})", label.title),
            None => label.title,
        })
        .collect())
}
