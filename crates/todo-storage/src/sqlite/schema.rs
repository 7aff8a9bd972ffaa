//! DDL statements for the SQLite schema.
//!
//! Timestamps are stored as TEXT in a fixed-width ISO 8601 format so that
//! string comparison orders them chronologically. Action codes are INTEGER;
//! states and target types are TEXT.

/// Current schema version, stored in `PRAGMA user_version`.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The schema at [`CURRENT_SCHEMA_VERSION`], applied to an empty database.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Todos table ---------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS todos (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        action      INTEGER NOT NULL,
        author_id   INTEGER,
        user_id     INTEGER NOT NULL,
        project_id  INTEGER NOT NULL,
        target_type TEXT NOT NULL,
        target_id   INTEGER,
        commit_id   TEXT,
        note_id     INTEGER,
        state       TEXT NOT NULL DEFAULT 'pending',
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        CHECK (state IN ('pending', 'done')),
        CHECK (
            (target_type = 'Commit' AND commit_id IS NOT NULL AND commit_id <> '')
            OR (target_type <> 'Commit' AND target_id IS NOT NULL)
        )
    )
    "#,
    // -- Indexes on todos ----------------------------------------------------
    // Serves both list orders: the user/state filter plus newest-first ids.
    "CREATE INDEX IF NOT EXISTS idx_todos_user_state ON todos(user_id, state, id DESC)",
    "CREATE INDEX IF NOT EXISTS idx_todos_target ON todos(target_type, target_id)",
    "CREATE INDEX IF NOT EXISTS idx_todos_project ON todos(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_todos_note ON todos(note_id)",
    "CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at)",
    // -- Target mirrors ------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS issues (
        id           INTEGER PRIMARY KEY,
        iid          INTEGER NOT NULL,
        project_id   INTEGER NOT NULL,
        project_path TEXT NOT NULL DEFAULT '',
        title        TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project_id)",
    r#"
    CREATE TABLE IF NOT EXISTS merge_requests (
        id           INTEGER PRIMARY KEY,
        iid          INTEGER NOT NULL,
        project_id   INTEGER NOT NULL,
        project_path TEXT NOT NULL DEFAULT '',
        title        TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_merge_requests_project ON merge_requests(project_id)",
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id         INTEGER PRIMARY KEY,
        project_id INTEGER NOT NULL,
        author_id  INTEGER,
        body       TEXT NOT NULL
    )
    "#,
    // -- Labels --------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS labels (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL,
        title      TEXT NOT NULL,
        priority   INTEGER,
        UNIQUE (project_id, title)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS label_links (
        label_id    INTEGER NOT NULL,
        target_type TEXT NOT NULL,
        target_id   INTEGER NOT NULL,
        PRIMARY KEY (label_id, target_type, target_id),
        FOREIGN KEY (label_id) REFERENCES labels(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_label_links_target ON label_links(target_type, target_id)",
];
