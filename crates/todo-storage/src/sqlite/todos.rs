//! Todo CRUD and state transitions for [`SqliteStore`].

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use todo_core::enums::{Action, TargetType};
use todo_core::state::{State, TodoEvent, TransitionError};
use todo_core::todo::{NewTodo, Todo};
use todo_core::validation::{ValidTodo, target_ref_from_parts, validate};

use crate::error::{CorruptRow, Result, StorageError};
use crate::sqlite::store::SqliteStore;

// ---------------------------------------------------------------------------
// Column list (shared between INSERT and SELECT)
// ---------------------------------------------------------------------------

/// All todo columns in a deterministic order for SELECT queries.
pub(crate) const TODO_COLUMNS: &str = "id, action, author_id, user_id, project_id, \
     target_type, target_id, commit_id, note_id, state, created_at, updated_at";

/// Same as [`TODO_COLUMNS`] but qualified with the `t` alias used by the
/// list query.
pub(crate) const TODO_COLUMNS_PREFIXED: &str = "t.id, t.action, t.author_id, t.user_id, \
     t.project_id, t.target_type, t.target_id, t.commit_id, t.note_id, t.state, \
     t.created_at, t.updated_at";

// ---------------------------------------------------------------------------
// Row scanning
// ---------------------------------------------------------------------------

fn corrupt(id: i64, idx: usize, ty: Type, reason: impl ToString) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        ty,
        Box::new(CorruptRow {
            entity: "todo",
            id,
            reason: reason.to_string(),
        }),
    )
}

/// Deserialises a row into a [`Todo`]. Columns are looked up by name.
///
/// Values that do not map back to the domain model surface as
/// [`StorageError::Corrupt`] once converted.
pub(crate) fn scan_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let id: i64 = row.get("id")?;
    let action_code: i32 = row.get("action")?;
    let author_id: Option<i64> = row.get("author_id")?;
    let user_id: i64 = row.get("user_id")?;
    let project_id: i64 = row.get("project_id")?;
    let target_type_str: String = row.get("target_type")?;
    let target_id: Option<i64> = row.get("target_id")?;
    let commit_id: Option<String> = row.get("commit_id")?;
    let note_id: Option<i64> = row.get("note_id")?;
    let state_str: String = row.get("state")?;
    let created_at_str: String = row.get("created_at")?;
    let updated_at_str: String = row.get("updated_at")?;

    let action = Action::from_code(action_code).ok_or_else(|| {
        corrupt(id, 1, Type::Integer, format!("unknown action code {action_code}"))
    })?;
    let target = target_ref_from_parts(
        TargetType::from(target_type_str),
        target_id,
        commit_id.as_deref(),
    )
    .map_err(|e| corrupt(id, 5, Type::Text, e))?;
    let state = state_str
        .parse::<State>()
        .map_err(|e| corrupt(id, 9, Type::Text, e))?;
    let created_at = parse_datetime(&created_at_str)
        .map_err(|e| corrupt(id, 10, Type::Text, format!("created_at {created_at_str:?}: {e}")))?;
    let updated_at = parse_datetime(&updated_at_str)
        .map_err(|e| corrupt(id, 11, Type::Text, format!("updated_at {updated_at_str:?}: {e}")))?;

    Ok(Todo {
        id,
        action,
        author_id,
        user_id,
        project_id,
        target,
        note_id,
        state,
        created_at,
        updated_at,
    })
}

// ---------------------------------------------------------------------------
// Timestamp helpers
// ---------------------------------------------------------------------------

/// Formats a `DateTime<Utc>` as a fixed-width ISO 8601 string for SQLite.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses a stored timestamp: RFC 3339 as written by [`format_datetime`]
/// and the column defaults, or SQLite's `datetime()` form.
pub(crate) fn parse_datetime(
    s: &str,
) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    s.parse::<DateTime<Utc>>().or_else(|_| {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
    })
}

// ---------------------------------------------------------------------------
// Connection-level helpers
// ---------------------------------------------------------------------------

/// Inserts a validated todo in the initial state and returns its id.
pub(crate) fn insert_todo(
    conn: &Connection,
    todo: &ValidTodo,
    created_at: &DateTime<Utc>,
) -> Result<i64> {
    let created_at_str = format_datetime(created_at);
    let target_type = todo.target.target_type();

    conn.execute(
        "INSERT INTO todos (
            action, author_id, user_id, project_id,
            target_type, target_id, commit_id, note_id,
            state, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            todo.action.code(),
            todo.author_id,
            todo.user_id,
            todo.project_id,
            target_type.as_str(),
            todo.target.target_id(),
            todo.target.commit_id(),
            todo.note_id,
            State::INITIAL.as_str(),
            created_at_str,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub(crate) fn get_todo_on_conn(conn: &Connection, id: i64) -> Result<Todo> {
    let sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1");
    conn.query_row(&sql, params![id], scan_todo)
        .optional()?
        .ok_or_else(|| StorageError::not_found("todo", id))
}

/// Applies `event` to a todo with a conditional update per source state
/// from [`State::sources_of`].
///
/// A row changes only when its current state is a source of `event`, so two
/// callers racing on the same todo cannot both succeed. When nothing changed
/// the row is read back to tell a missing todo from a rejected move.
pub(crate) fn transition_on_conn(conn: &Connection, id: i64, event: TodoEvent) -> Result<Todo> {
    let now_str = format_datetime(&Utc::now());

    for from in State::sources_of(event) {
        let to = from
            .apply(event)
            .map_err(|e| StorageError::invalid_transition(id, e))?;
        let changed = conn.execute(
            "UPDATE todos SET state = ?1, updated_at = ?2 WHERE id = ?3 AND state = ?4",
            params![to.as_str(), now_str, id, from.as_str()],
        )?;
        if changed == 1 {
            debug!(id, %from, %to, "todo transitioned");
            return get_todo_on_conn(conn, id);
        }
    }

    let current: Option<String> = conn
        .query_row(
            "SELECT state FROM todos WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;

    match current {
        None => Err(StorageError::not_found("todo", id)),
        Some(s) => {
            let from = s
                .parse::<State>()
                .map_err(|e| StorageError::corrupt("todo", id, e.to_string()))?;
            Err(StorageError::invalid_transition(id, TransitionError { from, event }))
        }
    }
}

/// Pending todo ids of a user, optionally restricted to `ids`.
fn pending_ids_on_conn(conn: &Connection, user_id: i64, ids: &[i64]) -> Result<Vec<i64>> {
    let mut sql = String::from("SELECT id FROM todos WHERE user_id = ?1 AND state = ?2");
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(user_id), Box::new(State::Pending.as_str())];

    if !ids.is_empty() {
        let placeholders: Vec<String> = (0..ids.len()).map(|j| format!("?{}", j + 3)).collect();
        sql.push_str(&format!(" AND id IN ({})", placeholders.join(",")));
        for id in ids {
            param_values.push(Box::new(*id));
        }
    }
    sql.push_str(" ORDER BY id ASC");

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), |row| row.get::<_, i64>(0))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// SqliteStore impl
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn create_todo_impl(&self, new: &NewTodo) -> Result<Todo> {
        let valid = validate(new)?;
        let created_at = new.created_at.unwrap_or_else(Utc::now);

        let conn = self.lock_conn()?;
        let id = insert_todo(&conn, &valid, &created_at)?;
        debug!(
            id,
            user_id = valid.user_id,
            action = valid.action.name(),
            target_type = %valid.target.target_type(),
            "todo created"
        );
        get_todo_on_conn(&conn, id)
    }

    pub fn get_todo_impl(&self, id: i64) -> Result<Todo> {
        let conn = self.lock_conn()?;
        get_todo_on_conn(&conn, id)
    }

    pub fn mark_done_impl(&self, id: i64) -> Result<Todo> {
        let conn = self.lock_conn()?;
        transition_on_conn(&conn, id, TodoEvent::Done)
    }

    pub fn mark_all_done_impl(&self, user_id: i64, ids: &[i64]) -> Result<Vec<i64>> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        let now_str = format_datetime(&Utc::now());
        let mut done = Vec::new();
        for id in pending_ids_on_conn(&tx, user_id, ids)? {
            let changed = tx.execute(
                "UPDATE todos SET state = ?1, updated_at = ?2 WHERE id = ?3 AND state = ?4",
                params![State::Done.as_str(), now_str, id, State::Pending.as_str()],
            )?;
            if changed == 1 {
                done.push(id);
            }
        }

        tx.commit()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;
        debug!(user_id, count = done.len(), "todos marked done");
        Ok(done)
    }

    pub fn count_todos_impl(&self, user_id: i64, state: State) -> Result<i64> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM todos WHERE user_id = ?1 AND state = ?2",
            params![user_id, state.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
