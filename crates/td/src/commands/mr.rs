//! `td mr` -- mirror merge requests that todos point at.

use anyhow::{Context, Result};

use todo_core::target::{MergeRequest, TargetEntity};
use todo_storage::EntityStorage;

use crate::cli::{EntityAddArgs, MrArgs, MrCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `td mr` command.
pub fn run(ctx: &RuntimeContext, args: &MrArgs) -> Result<()> {
    match &args.command {
        MrCommands::Add(add) => run_add(ctx, add),
    }
}

fn run_add(ctx: &RuntimeContext, args: &EntityAddArgs) -> Result<()> {
    let mr = MergeRequest {
        id: args.id,
        iid: args.iid,
        project_id: args.project,
        project_path: args.path.clone(),
        title: args.title.clone(),
    };
    let service = ctx.open()?;
    service
        .store()
        .upsert_merge_request(&mr)
        .with_context(|| format!("failed to save merge request {}", mr.id))?;

    if ctx.json {
        output_json(&mr);
    } else if !ctx.quiet {
        println!("Saved merge request {} ({})", mr.id, mr.to_reference());
    }
    Ok(())
}
