//! `td create` -- create a pending todo.

use anyhow::{Context, Result};

use todo_core::enums::{Action, TargetType};
use todo_core::todo::NewTodo;

use crate::cli::CreateArgs;
use crate::commands::todo_view;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `td create` command.
pub fn run(ctx: &RuntimeContext, args: &CreateArgs) -> Result<()> {
    let user = ctx.require_user()?;
    let action: Action = args.action.parse()?;
    let new = build_new_todo(user, action, args);

    let service = ctx.open()?;
    let todo = service.create(&new).context("failed to create todo")?;

    if ctx.json {
        output_json(&todo_view(&service, &todo)?);
    } else if ctx.quiet {
        println!("{}", todo.id);
    } else {
        let view = todo_view(&service, &todo)?;
        println!(
            "Created todo {} ({} on {})",
            todo.id,
            view.action_name,
            view.target_display()
        );
    }
    Ok(())
}

/// Collects the flags into creation input. Missing pieces are left for
/// validation to report.
fn build_new_todo(user: i64, action: Action, args: &CreateArgs) -> NewTodo {
    let mut builder = NewTodo::builder(action).user(user);
    if let Some(project) = args.project {
        builder = builder.project(project);
    }
    if let Some(author) = args.author {
        builder = builder.author(author);
    }
    if let Some(note) = args.note {
        builder = builder.note(note);
    }

    builder = if let Some(id) = args.issue {
        builder.issue(id)
    } else if let Some(id) = args.mr {
        builder.merge_request(id)
    } else if let Some(ref sha) = args.commit {
        builder.commit(sha.clone())
    } else if let (Some(kind), Some(id)) = (&args.target_type, args.target_id) {
        builder.target(TargetType::parse_loose(kind), id)
    } else {
        builder
    };

    let mut new = builder.build();
    if new.target_type.is_none() {
        new.target_type = args.target_type.as_deref().map(TargetType::parse_loose);
    }
    new
}
