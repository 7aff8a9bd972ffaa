//! `td count` -- count the acting user's todos by state.

use anyhow::{Context, Result};

use todo_core::state::State;

use crate::cli::CountArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `td count` command.
pub fn run(ctx: &RuntimeContext, args: &CountArgs) -> Result<()> {
    let user = ctx.require_user()?;
    let state = args
        .state
        .as_deref()
        .map(str::parse::<State>)
        .transpose()
        .context("invalid --state")?;

    let service = ctx.open()?;

    if let Some(state) = state {
        let count = match state {
            State::Pending => service.pending_count(user)?,
            State::Done => service.done_count(user)?,
        };
        if ctx.json {
            output_json(&serde_json::json!({ "state": state.as_str(), "count": count }));
        } else {
            println!("{count}");
        }
        return Ok(());
    }

    let pending = service.pending_count(user)?;
    let done = service.done_count(user)?;
    if ctx.json {
        output_json(&serde_json::json!({ "pending": pending, "done": done }));
    } else {
        output_table(
            &["STATE", "COUNT"],
            &[
                vec![State::Pending.as_str().to_string(), pending.to_string()],
                vec![State::Done.as_str().to_string(), done.to_string()],
            ],
        );
    }
    Ok(())
}
