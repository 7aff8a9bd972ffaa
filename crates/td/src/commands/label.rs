//! `td label` -- project labels and their priorities.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use todo_core::enums::TargetType;
use todo_storage::{EntityStorage, Label, LabelPriorityResolver};

use crate::cli::{
    LabelAddArgs, LabelArgs, LabelCommands, LabelLinkArgs, LabelPriorityArgs, LabelTargetArgs,
};
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

#[derive(Serialize)]
struct LabelView {
    id: i64,
    project_id: i64,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
}

impl From<Label> for LabelView {
    fn from(label: Label) -> Self {
        Self {
            id: label.id,
            project_id: label.project_id,
            title: label.title,
            priority: label.priority,
        }
    }
}

/// Execute the `td label` command.
pub fn run(ctx: &RuntimeContext, args: &LabelArgs) -> Result<()> {
    match &args.command {
        LabelCommands::Add(add) => run_add(ctx, add),
        LabelCommands::Priority(p) => run_priority(ctx, p),
        LabelCommands::Apply(link) => run_link(ctx, link, true),
        LabelCommands::Remove(link) => run_link(ctx, link, false),
        LabelCommands::List(target) => run_list(ctx, target),
    }
}

fn run_add(ctx: &RuntimeContext, args: &LabelAddArgs) -> Result<()> {
    let service = ctx.open()?;
    let label = service
        .store()
        .create_label(args.project, &args.title, args.priority)
        .with_context(|| format!("failed to create label '{}'", args.title))?;

    if ctx.json {
        output_json(&LabelView::from(label));
    } else if ctx.quiet {
        println!("{}", label.id);
    } else {
        println!("Created label {} '{}'", label.id, label.title);
    }
    Ok(())
}

fn run_priority(ctx: &RuntimeContext, args: &LabelPriorityArgs) -> Result<()> {
    let priority = if args.clear { None } else { args.priority };
    let service = ctx.open()?;
    service.store().set_label_priority(args.label, priority)?;

    if ctx.json {
        output_json(&serde_json::json!({ "id": args.label, "priority": priority }));
    } else if !ctx.quiet {
        match priority {
            Some(p) => println!("Label {} priority set to {p}", args.label),
            None => println!("Label {} priority cleared", args.label),
        }
    }
    Ok(())
}

fn run_link(ctx: &RuntimeContext, args: &LabelLinkArgs, attach: bool) -> Result<()> {
    let (target_type, target_id) = labelled(&args.target)?;
    let service = ctx.open()?;
    let store = service.store();
    if attach {
        store.link_label(args.label, &target_type, target_id)?;
    } else {
        store.unlink_label(args.label, &target_type, target_id)?;
    }

    if ctx.json {
        let highest = store.highest_label_priority(&target_type, target_id)?;
        output_json(&serde_json::json!({
            "label": args.label,
            "target_type": target_type.as_str(),
            "target_id": target_id,
            "highest_priority": highest,
        }));
    } else if !ctx.quiet {
        let verb = if attach { "applied to" } else { "removed from" };
        println!("Label {} {verb} {target_type} {target_id}", args.label);
    }
    Ok(())
}

fn run_list(ctx: &RuntimeContext, args: &LabelTargetArgs) -> Result<()> {
    let (target_type, target_id) = labelled(args)?;
    let service = ctx.open()?;
    let labels = service.store().labels_for(&target_type, target_id)?;

    if ctx.json {
        let views: Vec<LabelView> = labels.into_iter().map(LabelView::from).collect();
        output_json(&views);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = labels
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.title.clone(),
                l.priority.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    output_table(&["ID", "TITLE", "PRIORITY"], &rows);
    Ok(())
}

fn labelled(args: &LabelTargetArgs) -> Result<(TargetType, i64)> {
    match (args.issue, args.mr) {
        (Some(id), _) => Ok((TargetType::Issue, id)),
        (None, Some(id)) => Ok((TargetType::MergeRequest, id)),
        (None, None) => bail!("pass --issue <id> or --mr <id>"),
    }
}
