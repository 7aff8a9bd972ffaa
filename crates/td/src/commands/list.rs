//! `td list` -- list the acting user's todos.

use anyhow::{Context, Result};

use todo_core::enums::{Action, SortOrder, TargetType};
use todo_core::filter::TodoFilter;
use todo_core::state::State;

use crate::cli::ListArgs;
use crate::commands::todo_view;
use crate::context::RuntimeContext;
use crate::output::{TODO_HEADERS, TodoView, output_json, output_table, todo_row};

/// Execute the `td list` command.
pub fn run(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let user = ctx.require_user()?;
    let filter = build_filter(user, args)?;

    let service = ctx.open()?;
    let todos = service.list_filtered(&filter)?;
    let views = todos
        .iter()
        .map(|todo| todo_view(&service, todo))
        .collect::<Result<Vec<TodoView>>>()?;

    if ctx.json {
        output_json(&views);
        return Ok(());
    }

    if views.is_empty() {
        if !ctx.quiet {
            println!("No {} todos.", filter.state.as_str());
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = views.iter().map(todo_row).collect();
    output_table(TODO_HEADERS, &rows);
    Ok(())
}

fn build_filter(user: i64, args: &ListArgs) -> Result<TodoFilter> {
    let state: State = args.state.parse().context("invalid --state")?;
    let order: SortOrder = args.sort.parse().context("invalid --sort")?;

    let mut filter = TodoFilter::new(user, state, order);
    if let Some(project) = args.project {
        filter = filter.project(project);
    }
    if let Some(author) = args.author {
        filter = filter.author(author);
    }
    if let Some(ref action) = args.action {
        let action: Action = action.parse().context("invalid --action")?;
        filter = filter.action(action);
    }
    if let Some(ref kind) = args.target_type {
        filter = filter.target_type(TargetType::parse_loose(kind));
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }
    Ok(filter)
}
