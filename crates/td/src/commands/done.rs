//! `td done` and `td done-all` -- mark todos as done.

use anyhow::Result;

use crate::cli::{DoneAllArgs, DoneArgs};
use crate::commands::{owned_todo, todo_view};
use crate::context::RuntimeContext;
use crate::output::output_json;
use crate::styles::render_state;

/// Execute the `td done` command.
///
/// Fails when the todo is already done.
pub fn run(ctx: &RuntimeContext, args: &DoneArgs) -> Result<()> {
    let user = ctx.require_user()?;
    let service = ctx.open()?;

    owned_todo(&service, user, args.id)?;
    let todo = service.complete(args.id)?;

    if ctx.json {
        output_json(&todo_view(&service, &todo)?);
    } else if !ctx.quiet {
        println!("Marked todo {} as {}", todo.id, render_state(todo.state));
    }
    Ok(())
}

/// Execute the `td done-all` command.
///
/// Ids that are not pending todos of the acting user are skipped.
pub fn run_all(ctx: &RuntimeContext, args: &DoneAllArgs) -> Result<()> {
    let user = ctx.require_user()?;
    let service = ctx.open()?;

    let done = service.complete_all(user, &args.ids)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "done": done,
            "count": done.len(),
        }));
    } else if !ctx.quiet {
        let noun = if done.len() == 1 { "todo" } else { "todos" };
        println!("Marked {} {noun} as done", done.len());
    }
    Ok(())
}
