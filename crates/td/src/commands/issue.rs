//! `td issue` -- mirror issues that todos point at.

use anyhow::{Context, Result};

use todo_core::target::{Issue, TargetEntity};
use todo_storage::EntityStorage;

use crate::cli::{EntityAddArgs, IssueArgs, IssueCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `td issue` command.
pub fn run(ctx: &RuntimeContext, args: &IssueArgs) -> Result<()> {
    match &args.command {
        IssueCommands::Add(add) => run_add(ctx, add),
    }
}

fn run_add(ctx: &RuntimeContext, args: &EntityAddArgs) -> Result<()> {
    let issue = Issue {
        id: args.id,
        iid: args.iid,
        project_id: args.project,
        project_path: args.path.clone(),
        title: args.title.clone(),
    };
    let service = ctx.open()?;
    service
        .store()
        .upsert_issue(&issue)
        .with_context(|| format!("failed to save issue {}", issue.id))?;

    if ctx.json {
        output_json(&issue);
    } else if !ctx.quiet {
        println!("Saved issue {} ({})", issue.id, issue.to_reference());
    }
    Ok(())
}
