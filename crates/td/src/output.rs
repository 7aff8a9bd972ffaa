//! Output formatting helpers for the `td` CLI.
//!
//! Provides JSON output, table formatting, and human-readable todo display
//! in both row (for tables) and detailed (multi-line) formats.

use std::io::{self, Write};

use serde::Serialize;

use todo_core::todo::Todo;

use crate::styles::{render_action, render_muted, render_reference, render_state};

/// Widest body shown in a table cell.
const BODY_WIDTH: usize = 50;

/// A view model for JSON and human output.
///
/// Carries the stored fields plus the derived ones (`action_name`, `body`,
/// `reference`) so consumers need not resolve targets themselves.
#[derive(Debug, Serialize)]
pub struct TodoView {
    pub id: i64,
    pub action: i32,
    pub action_name: String,
    pub state: String,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    pub project_id: i64,
    pub target_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip)]
    todo: Todo,
}

impl TodoView {
    /// Build a view from a todo and its resolved target details.
    pub fn new(todo: &Todo, reference: Option<String>, body: Option<String>) -> Self {
        Self {
            id: todo.id,
            action: todo.action.code(),
            action_name: todo.action_name().to_string(),
            state: todo.state.as_str().to_string(),
            user_id: todo.user_id,
            author_id: todo.author_id,
            project_id: todo.project_id,
            target_type: todo.target.target_type().as_str().to_string(),
            target_id: todo.target.target_id(),
            commit_id: todo.target.commit_id().map(str::to_string),
            note_id: todo.note_id,
            reference,
            body,
            labels: Vec::new(),
            created_at: todo.created_at.to_rfc3339(),
            updated_at: todo.updated_at.to_rfc3339(),
            todo: todo.clone(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// The reference if the target resolved, else a raw `kind:id` handle.
    pub fn target_display(&self) -> String {
        if let Some(ref r) = self.reference {
            return r.clone();
        }
        match (&self.commit_id, self.target_id) {
            (Some(sha), _) => format!("commit:{sha}"),
            (None, Some(id)) => format!("{}:{id}", self.target_type),
            (None, None) => self.target_type.clone(),
        }
    }
}

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the data for alignment.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = write!(handle, "{}", format_table(headers, rows));
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &separator, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, row: &[String], widths: &[usize]) {
    let last = row.len().saturating_sub(1);
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        match widths.get(i) {
            Some(&width) if i < last => out.push_str(&format!("{:<width$}", cell, width = width)),
            _ => out.push_str(cell),
        }
    }
    out.push('\n');
}

/// Column headers matching [`todo_row`].
pub const TODO_HEADERS: &[&str] = &["ID", "STATE", "ACTION", "TARGET", "CREATED", "BODY"];

/// One table row for a todo.
pub fn todo_row(view: &TodoView) -> Vec<String> {
    vec![
        view.id.to_string(),
        view.state.clone(),
        view.action_name.clone(),
        view.target_display(),
        view.todo.created_at.format("%Y-%m-%d %H:%M").to_string(),
        truncate(view.body.as_deref().unwrap_or(""), BODY_WIDTH),
    ]
}

/// Format a todo as a detailed multi-line string.
pub fn format_todo_detail(view: &TodoView) -> String {
    let mut lines = vec![format!(
        "Todo {}  [{}]  {}",
        view.id,
        render_state(view.todo.state),
        render_action(view.todo.action)
    )];

    lines.push(format!(
        "Target:   {}",
        render_reference(&view.target_display())
    ));
    if let Some(ref body) = view.body {
        lines.push(format!("Body:     {body}"));
    }
    if !view.labels.is_empty() {
        lines.push(format!("Labels:   {}", view.labels.join(", ")));
    }
    lines.push(format!("Project:  {}", view.project_id));
    if let Some(author) = view.author_id {
        lines.push(format!("Author:   {author}"));
    }
    if let Some(note) = view.note_id {
        lines.push(format!("Note:     {note}"));
    }
    lines.push(render_muted(&format!(
        "Created:  {}",
        view.todo.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )));
    if view.todo.updated_at != view.todo.created_at {
        lines.push(render_muted(&format!(
            "Updated:  {}",
            view.todo.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )));
    }
    lines.join("\n")
}

/// Shortens `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    if first_line.chars().count() <= max && first_line.trim_end().len() == s.trim_end().len() {
        return first_line.to_string();
    }
    let keep = max.saturating_sub(3);
    let head: String = first_line.chars().take(keep).collect();
    format!("{head}...")
}
