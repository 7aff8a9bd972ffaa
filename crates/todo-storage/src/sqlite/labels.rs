//! Label operations for [`SqliteStore`].

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use todo_core::enums::TargetType;

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;
use crate::traits::Label;

/// `MIN(priority)` over the labels linked to the target named by the two
/// SQL expressions.
fn min_priority_sql(target_type: &str, target_id: &str) -> String {
    format!(
        "SELECT MIN(l.priority) FROM label_links ll JOIN labels l ON l.id = ll.label_id \
         WHERE ll.target_type = {target_type} AND ll.target_id = {target_id}"
    )
}

/// Correlated subquery yielding the most urgent label priority of the todo
/// aliased `t`. NULL when the target has no prioritized label or its kind is
/// not in [`TargetType::LABEL_PRIORITY_KINDS`].
pub(crate) fn highest_priority_sql() -> String {
    let kinds: Vec<String> = TargetType::LABEL_PRIORITY_KINDS
        .iter()
        .map(|kind| format!("'{}'", kind.as_str()))
        .collect();
    format!(
        "{} AND t.target_type IN ({})",
        min_priority_sql("t.target_type", "t.target_id"),
        kinds.join(", ")
    )
}

fn scan_label(row: &rusqlite::Row<'_>) -> rusqlite::Result<Label> {
    Ok(Label {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        title: row.get("title")?,
        priority: row.get("priority")?,
    })
}

fn get_label_on_conn(conn: &Connection, label_id: i64) -> Result<Label> {
    conn.query_row(
        "SELECT id, project_id, title, priority FROM labels WHERE id = ?1",
        params![label_id],
        scan_label,
    )
    .optional()?
    .ok_or_else(|| StorageError::not_found("label", label_id))
}

pub(crate) fn highest_label_priority_on_conn(
    conn: &Connection,
    target_type: &TargetType,
    target_id: i64,
) -> Result<Option<i32>> {
    if !target_type.has_label_priority() {
        return Ok(None);
    }
    let priority: Option<i32> = conn.query_row(
        &min_priority_sql("?1", "?2"),
        params![target_type.as_str(), target_id],
        |row| row.get(0),
    )?;
    Ok(priority)
}

impl SqliteStore {
    /// Creates a label, or updates the priority of the project's label with
    /// the same title.
    pub fn create_label_impl(
        &self,
        project_id: i64,
        title: &str,
        priority: Option<i32>,
    ) -> Result<Label> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO labels (project_id, title, priority) VALUES (?1, ?2, ?3)
             ON CONFLICT(project_id, title) DO UPDATE SET priority = excluded.priority",
            params![project_id, title, priority],
        )?;
        let label = conn.query_row(
            "SELECT id, project_id, title, priority FROM labels
             WHERE project_id = ?1 AND title = ?2",
            params![project_id, title],
            scan_label,
        )?;
        debug!(id = label.id, project_id, title, ?priority, "label saved");
        Ok(label)
    }

    pub fn set_label_priority_impl(&self, label_id: i64, priority: Option<i32>) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            "UPDATE labels SET priority = ?1 WHERE id = ?2",
            params![priority, label_id],
        )?;
        if changed == 0 {
            return Err(StorageError::not_found("label", label_id));
        }
        Ok(())
    }

    pub fn link_label_impl(
        &self,
        label_id: i64,
        target_type: &TargetType,
        target_id: i64,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        get_label_on_conn(&conn, label_id)?;
        conn.execute(
            "INSERT OR IGNORE INTO label_links (label_id, target_type, target_id)
             VALUES (?1, ?2, ?3)",
            params![label_id, target_type.as_str(), target_id],
        )?;
        Ok(())
    }

    pub fn unlink_label_impl(
        &self,
        label_id: i64,
        target_type: &TargetType,
        target_id: i64,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "DELETE FROM label_links WHERE label_id = ?1 AND target_type = ?2 AND target_id = ?3",
            params![label_id, target_type.as_str(), target_id],
        )?;
        Ok(())
    }

    pub fn labels_for_impl(&self, target_type: &TargetType, target_id: i64) -> Result<Vec<Label>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT l.id, l.project_id, l.title, l.priority
             FROM label_links ll JOIN labels l ON l.id = ll.label_id
             WHERE ll.target_type = ?1 AND ll.target_id = ?2
             ORDER BY l.priority IS NULL, l.priority ASC, l.title ASC",
        )?;
        let rows = stmt.query_map(params![target_type.as_str(), target_id], scan_label)?;

        let mut labels = Vec::new();
        for row in rows {
            labels.push(row?);
        }
        Ok(labels)
    }

    pub fn highest_label_priority_impl(
        &self,
        target_type: &TargetType,
        target_id: i64,
    ) -> Result<Option<i32>> {
        let conn = self.lock_conn()?;
        highest_label_priority_on_conn(&conn, target_type, target_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn list_subquery_covers_priority_kinds() {
        let sql = highest_priority_sql();
        assert!(sql.ends_with("AND t.target_type IN ('Issue', 'MergeRequest')"));
        for kind in &TargetType::LABEL_PRIORITY_KINDS {
            assert!(kind.has_label_priority());
            assert!(sql.contains(&format!("'{}'", kind.as_str())));
        }
    }

    #[test]
    fn create_label_upserts_by_title() {
        let store = test_store();
        let first = store.create_label_impl(1, "bug", Some(4)).unwrap();
        let again = store.create_label_impl(1, "bug", Some(2)).unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(again.priority, Some(2));

        let other_project = store.create_label_impl(2, "bug", None).unwrap();
        assert_ne!(other_project.id, first.id);
    }

    #[test]
    fn highest_priority_is_minimum() {
        let store = test_store();
        let low = store.create_label_impl(1, "low", Some(9)).unwrap();
        let high = store.create_label_impl(1, "high", Some(1)).unwrap();
        let none = store.create_label_impl(1, "none", None).unwrap();
        for label in [&low, &high, &none] {
            store.link_label_impl(label.id, &TargetType::Issue, 5).unwrap();
        }

        assert_eq!(
            store.highest_label_priority_impl(&TargetType::Issue, 5).unwrap(),
            Some(1)
        );
        let titles: Vec<_> = store
            .labels_for_impl(&TargetType::Issue, 5)
            .unwrap()
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["high", "low", "none"]);
    }

    #[test]
    fn highest_priority_none_cases() {
        let store = test_store();
        assert_eq!(
            store.highest_label_priority_impl(&TargetType::Issue, 1).unwrap(),
            None
        );

        let unprioritized = store.create_label_impl(1, "question", None).unwrap();
        store.link_label_impl(unprioritized.id, &TargetType::MergeRequest, 1).unwrap();
        assert_eq!(
            store
                .highest_label_priority_impl(&TargetType::MergeRequest, 1)
                .unwrap(),
            None
        );

        assert_eq!(
            store.highest_label_priority_impl(&TargetType::Commit, 1).unwrap(),
            None
        );
    }

    #[test]
    fn priority_changes_are_visible() {
        let store = test_store();
        let label = store.create_label_impl(1, "triage", None).unwrap();
        store.link_label_impl(label.id, &TargetType::Issue, 1).unwrap();
        store.set_label_priority_impl(label.id, Some(3)).unwrap();
        assert_eq!(
            store.highest_label_priority_impl(&TargetType::Issue, 1).unwrap(),
            Some(3)
        );

        store.unlink_label_impl(label.id, &TargetType::Issue, 1).unwrap();
        assert_eq!(
            store.highest_label_priority_impl(&TargetType::Issue, 1).unwrap(),
            None
        );
    }

    #[test]
    fn unknown_label_is_not_found() {
        let store = test_store();
        assert!(store.set_label_priority_impl(42, Some(1)).unwrap_err().is_not_found());
        assert!(store
            .link_label_impl(42, &TargetType::Issue, 1)
            .unwrap_err()
            .is_not_found());
    }
}
