//! Mirrors of issues, merge requests and notes.

use rusqlite::{OptionalExtension, params};

use todo_core::target::{Issue, MergeRequest, Note};

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;

impl SqliteStore {
    pub fn upsert_issue_impl(&self, issue: &Issue) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO issues (id, iid, project_id, project_path, title)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                iid = excluded.iid,
                project_id = excluded.project_id,
                project_path = excluded.project_path,
                title = excluded.title",
            params![
                issue.id,
                issue.iid,
                issue.project_id,
                issue.project_path,
                issue.title
            ],
        )?;
        Ok(())
    }

    pub fn get_issue_impl(&self, id: i64) -> Result<Issue> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT id, iid, project_id, project_path, title FROM issues WHERE id = ?1",
            params![id],
            |row| {
                Ok(Issue {
                    id: row.get(0)?,
                    iid: row.get(1)?,
                    project_id: row.get(2)?,
                    project_path: row.get(3)?,
                    title: row.get(4)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("issue", id))
    }

    pub fn upsert_merge_request_impl(&self, mr: &MergeRequest) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO merge_requests (id, iid, project_id, project_path, title)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                iid = excluded.iid,
                project_id = excluded.project_id,
                project_path = excluded.project_path,
                title = excluded.title",
            params![mr.id, mr.iid, mr.project_id, mr.project_path, mr.title],
        )?;
        Ok(())
    }

    pub fn get_merge_request_impl(&self, id: i64) -> Result<MergeRequest> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT id, iid, project_id, project_path, title FROM merge_requests WHERE id = ?1",
            params![id],
            |row| {
                Ok(MergeRequest {
                    id: row.get(0)?,
                    iid: row.get(1)?,
                    project_id: row.get(2)?,
                    project_path: row.get(3)?,
                    title: row.get(4)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("merge request", id))
    }

    pub fn upsert_note_impl(&self, note: &Note) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO notes (id, project_id, author_id, body) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                project_id = excluded.project_id,
                author_id = excluded.author_id,
                body = excluded.body",
            params![note.id, note.project_id, note.author_id, note.body],
        )?;
        Ok(())
    }

    pub fn get_note_impl(&self, id: i64) -> Result<Note> {
        let conn = self.lock_conn()?;
        conn.query_row(
            "SELECT id, project_id, author_id, body FROM notes WHERE id = ?1",
            params![id],
            |row| {
                Ok(Note {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    author_id: row.get(2)?,
                    body: row.get(3)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("note", id))
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
    fn issue_upsert_replaces_title() {
        let store = test_store();
        let mut issue = Issue {
            id: 10,
            iid: 3,
            project_id: 1,
            project_path: "group/app".into(),
            title: "Crash on start".into(),
        };
        store.upsert_issue_impl(&issue).unwrap();
        issue.title = "Crash on startup".into();
        store.upsert_issue_impl(&issue).unwrap();

        assert_eq!(store.get_issue_impl(10).unwrap(), issue);
    }

    #[test]
    fn merge_request_round_trip() {
        let store = test_store();
        let mr = MergeRequest {
            id: 20,
            iid: 7,
            project_id: 1,
            project_path: "group/app".into(),
            title: "Fix crash".into(),
        };
        store.upsert_merge_request_impl(&mr).unwrap();
        assert_eq!(store.get_merge_request_impl(20).unwrap(), mr);
        assert!(store.get_merge_request_impl(21).unwrap_err().is_not_found());
    }

    #[test]
    fn note_round_trip() {
        let store = test_store();
        let note = Note {
            id: 5,
            project_id: 1,
            author_id: None,
            body: "please take a look".into(),
        };
        store.upsert_note_impl(&note).unwrap();
        assert_eq!(store.get_note_impl(5).unwrap(), note);
        assert!(store.get_issue_impl(5).unwrap_err().is_not_found());
    }
}
