//! `td note` -- mirror notes that raise todos.

use anyhow::{Context, Result};

use todo_core::target::Note;
use todo_storage::EntityStorage;

use crate::cli::{NoteAddArgs, NoteArgs, NoteCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `td note` command.
pub fn run(ctx: &RuntimeContext, args: &NoteArgs) -> Result<()> {
    match &args.command {
        NoteCommands::Add(add) => run_add(ctx, add),
    }
}

fn run_add(ctx: &RuntimeContext, args: &NoteAddArgs) -> Result<()> {
    let note = Note {
        id: args.id,
        project_id: args.project,
        author_id: args.author,
        body: args.body.clone(),
    };
    let service = ctx.open()?;
    service
        .store()
        .upsert_note(&note)
        .with_context(|| format!("failed to save note {}", note.id))?;

    if ctx.json {
        output_json(&note);
    } else if !ctx.quiet {
        println!("Saved note {}", note.id);
    }
    Ok(())
}
