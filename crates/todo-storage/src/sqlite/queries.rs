//! List queries: recency and label-priority ordering.

use todo_core::enums::SortOrder;
use todo_core::filter::TodoFilter;
use todo_core::todo::Todo;

use crate::error::Result;
use crate::sqlite::labels::highest_priority_sql;
use crate::sqlite::store::SqliteStore;
use crate::sqlite::todos::{TODO_COLUMNS_PREFIXED, scan_todo};

/// Builds the list statement and its positional parameters.
fn build_list_query(filter: &TodoFilter) -> (String, Vec<Box<dyn rusqlite::types::ToSql>>) {
    let mut where_clauses: Vec<String> = vec!["t.user_id = ?1".into(), "t.state = ?2".into()];
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
        Box::new(filter.user_id),
        Box::new(filter.state.as_str().to_string()),
    ];
    let mut param_idx = 3;

    if let Some(project_id) = filter.project_id {
        where_clauses.push(format!("t.project_id = ?{param_idx}"));
        param_values.push(Box::new(project_id));
        param_idx += 1;
    }
    if let Some(author_id) = filter.author_id {
        where_clauses.push(format!("t.author_id = ?{param_idx}"));
        param_values.push(Box::new(author_id));
        param_idx += 1;
    }
    if let Some(action) = filter.action {
        where_clauses.push(format!("t.action = ?{param_idx}"));
        param_values.push(Box::new(action.code()));
        param_idx += 1;
    }
    if let Some(ref target_type) = filter.target_type {
        where_clauses.push(format!("t.target_type = ?{param_idx}"));
        param_values.push(Box::new(target_type.as_str().to_string()));
        param_idx += 1;
    }

    let (select_extra, order_sql) = match filter.order {
        SortOrder::Recency => (String::new(), "t.id DESC"),
        SortOrder::Priority => (
            format!(", ({}) AS highest_priority", highest_priority_sql()),
            "highest_priority IS NULL, highest_priority ASC, t.created_at ASC, t.id ASC",
        ),
        SortOrder::CreatedAsc => (String::new(), "t.created_at ASC, t.id ASC"),
        SortOrder::CreatedDesc => (String::new(), "t.created_at DESC, t.id DESC"),
        SortOrder::UpdatedAsc => (String::new(), "t.updated_at ASC, t.id ASC"),
        SortOrder::UpdatedDesc => (String::new(), "t.updated_at DESC, t.id DESC"),
    };

    let mut sql = format!(
        "SELECT {TODO_COLUMNS_PREFIXED}{select_extra} FROM todos t WHERE {} ORDER BY {order_sql}",
        where_clauses.join(" AND ")
    );

    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT ?{param_idx}"));
        param_values.push(Box::new(i64::from(limit)));
    }

    (sql, param_values)
}

impl SqliteStore {
    /// Lists a user's todos in one state, ordered per `filter.order`.
    ///
    /// Priority order ranks by the most urgent label priority on the
    /// target. Todos without one (unlabelled, unprioritized, or targets of
    /// a kind without labels) come last. Ties fall back to creation time,
    /// then id.
    pub fn list_todos_impl(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let conn = self.lock_conn()?;
        let (sql, param_values) = build_list_query(filter);

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), scan_todo)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }
}
