//! [`TodoService`] -- the operations callers use.

use std::sync::Arc;

use tracing::{debug, warn};

use todo_core::enums::SortOrder;
use todo_core::enums::TargetType;
use todo_core::filter::TodoFilter;
use todo_core::repository::RepositoryProvider;
use todo_core::state::State;
use todo_core::target::{Target, TargetEntity};
use todo_core::todo::{NewTodo, TargetRef, Todo};
use todo_storage::{EntityStorage, StorageError, TodoStorage};

use crate::error::Result;
use crate::keep_around::KeepAround;

/// Creates, completes and lists todos, and resolves what they point at.
pub struct TodoService<S> {
    store: Arc<S>,
    repositories: Arc<dyn RepositoryProvider>,
    keep_around: KeepAround,
}

impl<S: TodoStorage + EntityStorage> TodoService<S> {
    pub fn new(
        store: Arc<S>,
        repositories: Arc<dyn RepositoryProvider>,
        keep_around: KeepAround,
    ) -> Self {
        Self {
            store,
            repositories,
            keep_around,
        }
    }

    /// The underlying store, for seeding entities and labels.
    pub fn store(&self) -> &S {
        &self.store
    }

    // -- Mutations -----------------------------------------------------------

    /// Validates and stores a new pending todo.
    pub fn create(&self, new: &NewTodo) -> Result<Todo> {
        let todo = self.store.create_todo(new)?;
        debug!(id = todo.id, user_id = todo.user_id, "created todo");
        self.after_save(&todo);
        Ok(todo)
    }

    /// Marks a pending todo as done. Fails on a todo that is already done.
    pub fn complete(&self, id: i64) -> Result<Todo> {
        let todo = self.store.mark_done(id)?;
        debug!(id, "completed todo");
        self.after_save(&todo);
        Ok(todo)
    }

    /// Marks the user's pending todos among `ids` as done (all of them when
    /// `ids` is empty) and returns the ids that changed.
    pub fn complete_all(&self, user_id: i64, ids: &[i64]) -> Result<Vec<i64>> {
        let done = self.store.mark_all_done(user_id, ids)?;
        for id in &done {
            match self.store.get_todo(*id) {
                Ok(todo) => self.after_save(&todo),
                Err(e) => warn!(id, error = %e, "could not reload completed todo"),
            }
        }
        Ok(done)
    }

    fn after_save(&self, todo: &Todo) {
        if let TargetRef::Commit { sha } = &todo.target {
            self.keep_around.dispatch(todo.project_id, sha);
        }
    }

    // -- Queries -------------------------------------------------------------

    pub fn get(&self, id: i64) -> Result<Todo> {
        Ok(self.store.get_todo(id)?)
    }

    /// The user's todos in `state`, in the requested order.
    pub fn list(&self, user_id: i64, state: State, order: SortOrder) -> Result<Vec<Todo>> {
        self.list_filtered(&TodoFilter::new(user_id, state, order))
    }

    pub fn list_filtered(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        Ok(self.store.list_todos(filter)?)
    }

    pub fn pending_count(&self, user_id: i64) -> Result<i64> {
        Ok(self.store.count_todos(user_id, State::Pending)?)
    }

    pub fn done_count(&self, user_id: i64) -> Result<i64> {
        Ok(self.store.count_todos(user_id, State::Done)?)
    }

    // -- Derived accessors ---------------------------------------------------

    pub fn is_commit_target(&self, todo: &Todo) -> bool {
        todo.is_for_commit()
    }

    pub fn action_name(&self, todo: &Todo) -> &'static str {
        todo.action_name()
    }

    /// Loads the todo's target.
    ///
    /// Commits are read live from the project's repository. A missing
    /// commit, a project without a repository and a failing repository all
    /// give `None`, as does a deleted entity or a kind this store does not
    /// mirror.
    pub fn resolve_target(&self, todo: &Todo) -> Result<Option<Target>> {
        match &todo.target {
            TargetRef::Commit { sha } => Ok(self.resolve_commit(todo.project_id, sha)),
            TargetRef::Entity { target_type, id } => match target_type {
                TargetType::Issue => absent_if_missing(self.store.get_issue(*id))
                    .map(|issue| issue.map(Target::Issue)),
                TargetType::MergeRequest => absent_if_missing(self.store.get_merge_request(*id))
                    .map(|mr| mr.map(Target::MergeRequest)),
                _ => Ok(None),
            },
        }
    }

    fn resolve_commit(&self, project_id: i64, sha: &str) -> Option<Target> {
        let Some(repo) = self.repositories.repository(project_id) else {
            debug!(project_id, sha, "no repository for project");
            return None;
        };
        match repo.commit(sha) {
            Ok(Some(commit)) => Some(Target::Commit(commit)),
            Ok(None) => {
                debug!(project_id, sha, "commit not found");
                None
            }
            Err(e) => {
                warn!(project_id, sha, error = %e, "commit lookup failed");
                None
            }
        }
    }

    /// Text to show for the todo: the triggering note's body, else the
    /// target's title.
    pub fn display_body(&self, todo: &Todo) -> Result<Option<String>> {
        if let Some(note_id) = todo.note_id {
            if let Some(note) = absent_if_missing(self.store.get_note(note_id))? {
                return Ok(Some(note.body));
            }
        }
        Ok(self
            .resolve_target(todo)?
            .map(|target| target.title().to_string()))
    }

    /// Short reference to the target: an abbreviated commit id, `#iid` for
    /// issues, `!iid` for merge requests.
    pub fn target_reference(&self, todo: &Todo) -> Result<Option<String>> {
        Ok(self
            .resolve_target(todo)?
            .map(|target| target.short_reference()))
    }
}

fn absent_if_missing<T>(res: std::result::Result<T, StorageError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl<S> std::fmt::Debug for TodoService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoService")
            .field("keep_around", &self.keep_around)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use todo_core::enums::Action;
    use todo_core::repository::{Repository, RepositoryError};
    use todo_core::target::{Commit, Issue, MergeRequest, Note};
    use todo_storage::SqliteStore;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    /// In-memory repository: known commits plus a record of keep-around calls.
    #[derive(Default)]
    struct FakeRepo {
        commits: HashMap<String, Commit>,
        kept: Mutex<Vec<String>>,
        broken: bool,
    }

    impl Repository for FakeRepo {
        fn keep_around(&self, sha: &str) -> std::result::Result<(), RepositoryError> {
            if self.broken {
                return Err(RepositoryError::Unavailable("offline".into()));
            }
            self.kept.lock().unwrap().push(sha.to_string());
            Ok(())
        }

        fn commit(&self, sha: &str) -> std::result::Result<Option<Commit>, RepositoryError> {
            if self.broken {
                return Err(RepositoryError::Unavailable("offline".into()));
            }
            Ok(self.commits.get(sha).cloned())
        }
    }

    struct FakeProvider(HashMap<i64, Arc<FakeRepo>>);

    impl RepositoryProvider for FakeProvider {
        fn repository(&self, project_id: i64) -> Option<Arc<dyn Repository>> {
            self.0
                .get(&project_id)
                .map(|r| Arc::clone(r) as Arc<dyn Repository>)
        }
    }

    fn commit(sha: &str, title: &str) -> Commit {
        Commit {
            id: sha.to_string(),
            title: title.to_string(),
            message: format!("{title}\n\nDetails."),
            author_name: "Ada".into(),
            author_email: "ada@example.com".into(),
            authored_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            project_path: "group/app".into(),
        }
    }

    fn repo_with(commits: &[Commit]) -> Arc<FakeRepo> {
        Arc::new(FakeRepo {
            commits: commits.iter().map(|c| (c.id.clone(), c.clone())).collect(),
            ..Default::default()
        })
    }

    fn service_with(repos: Vec<(i64, Arc<FakeRepo>)>) -> TodoService<SqliteStore> {
        let provider: Arc<dyn RepositoryProvider> =
            Arc::new(FakeProvider(repos.into_iter().collect()));
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        TodoService::new(store, Arc::clone(&provider), KeepAround::inline(provider))
    }

    fn seed_issue(service: &TodoService<SqliteStore>, id: i64, iid: i64, title: &str) {
        service
            .store()
            .upsert_issue(&Issue {
                id,
                iid,
                project_id: 1,
                project_path: "group/app".into(),
                title: title.into(),
            })
            .unwrap();
    }

    fn commit_todo(user_id: i64) -> NewTodo {
        NewTodo::builder(Action::BuildFailed)
            .user(user_id)
            .project(1)
            .commit(SHA)
            .build()
    }

    #[test]
    fn create_commit_todo_keeps_commit_around() {
        let repo = repo_with(&[commit(SHA, "Fix build")]);
        let service = service_with(vec![(1, Arc::clone(&repo))]);

        let todo = service.create(&commit_todo(1)).unwrap();
        assert!(service.is_commit_target(&todo));
        assert_eq!(*repo.kept.lock().unwrap(), vec![SHA.to_string()]);

        service.complete(todo.id).unwrap();
        assert_eq!(repo.kept.lock().unwrap().len(), 2);
    }

    #[test]
    fn entity_todos_do_not_touch_repository() {
        let repo = repo_with(&[]);
        let service = service_with(vec![(1, Arc::clone(&repo))]);
        let todo = service
            .create(&NewTodo::builder(Action::Assigned).user(1).project(1).issue(10).build())
            .unwrap();
        service.complete(todo.id).unwrap();
        assert!(repo.kept.lock().unwrap().is_empty());
    }

    #[test]
    fn keep_around_failure_does_not_fail_create() {
        let repo = Arc::new(FakeRepo {
            broken: true,
            ..Default::default()
        });
        let service = service_with(vec![(1, repo)]);
        let todo = service.create(&commit_todo(1)).unwrap();
        assert_eq!(todo.state, State::Pending);

        let no_repo = service_with(vec![]);
        assert!(no_repo.create(&commit_todo(1)).is_ok());
    }

    #[test]
    fn create_reports_validation_errors() {
        let service = service_with(vec![]);
        let new = NewTodo::builder(Action::Assigned).project(1).issue(10).build();
        let err = service.create(&new).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn complete_twice_is_invalid_transition() {
        let service = service_with(vec![]);
        let todo = service
            .create(&NewTodo::builder(Action::Mentioned).user(1).project(1).issue(10).build())
            .unwrap();

        assert_eq!(service.complete(todo.id).unwrap().state, State::Done);
        let err = service.complete(todo.id).unwrap_err();
        assert!(err.is_invalid_transition());
        assert!(service.complete(9999).unwrap_err().is_not_found());
    }

    #[test]
    fn complete_all_dispatches_for_commit_todos() {
        let repo = repo_with(&[]);
        let service = service_with(vec![(1, Arc::clone(&repo))]);
        let a = service.create(&commit_todo(1)).unwrap();
        let b = service
            .create(&NewTodo::builder(Action::Assigned).user(1).project(1).issue(10).build())
            .unwrap();
        repo.kept.lock().unwrap().clear();

        let done = service.complete_all(1, &[]).unwrap();
        assert_eq!(done, vec![a.id, b.id]);
        assert_eq!(repo.kept.lock().unwrap().len(), 1);
        assert_eq!(service.pending_count(1).unwrap(), 0);
        assert_eq!(service.done_count(1).unwrap(), 2);
    }

    #[test]
    fn scenario_priority_listing() {
        let service = service_with(vec![]);
        let store = service.store();
        let p1 = store.create_label(1, "P1", Some(1)).unwrap();
        let p2 = store.create_label(1, "P2", Some(2)).unwrap();
        store.link_label(p2.id, &TargetType::Issue, 10).unwrap();
        store.link_label(p1.id, &TargetType::Issue, 11).unwrap();

        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let a = service
            .create(
                &NewTodo::builder(Action::Assigned)
                    .user(1)
                    .project(1)
                    .issue(10)
                    .created_at(t0)
                    .build(),
            )
            .unwrap();
        let b = service
            .create(
                &NewTodo::builder(Action::Assigned)
                    .user(1)
                    .project(1)
                    .issue(11)
                    .created_at(t0 + Duration::minutes(1))
                    .build(),
            )
            .unwrap();
        let c = service
            .create(
                &NewTodo::builder(Action::Mentioned)
                    .user(1)
                    .project(1)
                    .merge_request(5)
                    .created_at(t0 + Duration::minutes(2))
                    .build(),
            )
            .unwrap();

        let by_priority: Vec<i64> = service
            .list(1, State::Pending, SortOrder::Priority)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(by_priority, vec![b.id, a.id, c.id]);

        let by_recency: Vec<i64> = service
            .list(1, State::Pending, SortOrder::Recency)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(by_recency, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn resolve_commit_target() {
        let repo = repo_with(&[commit(SHA, "Fix build")]);
        let service = service_with(vec![(1, repo)]);
        let todo = service.create(&commit_todo(1)).unwrap();

        let target = service.resolve_target(&todo).unwrap().unwrap();
        assert_eq!(target.target_type(), TargetType::Commit);
        assert_eq!(service.target_reference(&todo).unwrap().as_deref(), Some("01234567"));
        assert_eq!(service.display_body(&todo).unwrap().as_deref(), Some("Fix build"));
        assert_eq!(service.action_name(&todo), "build_failed");
    }

    #[test]
    fn missing_commit_resolves_to_none() {
        let service = service_with(vec![(1, repo_with(&[]))]);
        let todo = service.create(&commit_todo(1)).unwrap();
        assert_eq!(service.resolve_target(&todo).unwrap(), None);
        assert_eq!(service.target_reference(&todo).unwrap(), None);
        assert_eq!(service.display_body(&todo).unwrap(), None);
    }

    #[test]
    fn failing_or_missing_repository_resolves_to_none() {
        let broken = Arc::new(FakeRepo {
            broken: true,
            ..Default::default()
        });
        let service = service_with(vec![(1, broken)]);
        let todo = service.create(&commit_todo(1)).unwrap();
        assert_eq!(service.resolve_target(&todo).unwrap(), None);

        let service = service_with(vec![]);
        let todo = service.create(&commit_todo(1)).unwrap();
        assert_eq!(service.resolve_target(&todo).unwrap(), None);
    }

    #[test]
    fn entity_targets_and_references() {
        let service = service_with(vec![]);
        seed_issue(&service, 10, 3, "Crash on start");
        service
            .store()
            .upsert_merge_request(&MergeRequest {
                id: 20,
                iid: 8,
                project_id: 1,
                project_path: "group/app".into(),
                title: "Fix crash".into(),
            })
            .unwrap();

        let issue_todo = service
            .create(&NewTodo::builder(Action::Assigned).user(1).project(1).issue(10).build())
            .unwrap();
        let mr_todo = service
            .create(
                &NewTodo::builder(Action::ApprovalRequired)
                    .user(1)
                    .project(1)
                    .merge_request(20)
                    .build(),
            )
            .unwrap();

        assert_eq!(service.target_reference(&issue_todo).unwrap().as_deref(), Some("#3"));
        assert_eq!(service.target_reference(&mr_todo).unwrap().as_deref(), Some("!8"));
        assert_eq!(
            service.display_body(&mr_todo).unwrap().as_deref(),
            Some("Fix crash")
        );
        assert!(!service.is_commit_target(&issue_todo));
    }

    #[test]
    fn deleted_or_unknown_entities_resolve_to_none() {
        let service = service_with(vec![]);
        let missing = service
            .create(&NewTodo::builder(Action::Assigned).user(1).project(1).issue(77).build())
            .unwrap();
        assert_eq!(service.resolve_target(&missing).unwrap(), None);

        let other = service
            .create(
                &NewTodo::builder(Action::Mentioned)
                    .user(1)
                    .project(1)
                    .target(TargetType::from("Epic"), 4)
                    .build(),
            )
            .unwrap();
        assert_eq!(service.resolve_target(&other).unwrap(), None);
    }

    #[test]
    fn display_body_prefers_note() {
        let service = service_with(vec![]);
        seed_issue(&service, 10, 3, "Crash on start");
        service
            .store()
            .upsert_note(&Note {
                id: 99,
                project_id: 1,
                author_id: Some(2),
                body: "@ada can you look?".into(),
            })
            .unwrap();

        let with_note = service
            .create(
                &NewTodo::builder(Action::Mentioned)
                    .user(1)
                    .project(1)
                    .issue(10)
                    .note(99)
                    .build(),
            )
            .unwrap();
        assert_eq!(
            service.display_body(&with_note).unwrap().as_deref(),
            Some("@ada can you look?")
        );

        let dangling_note = service
            .create(
                &NewTodo::builder(Action::Mentioned)
                    .user(1)
                    .project(1)
                    .issue(10)
                    .note(100)
                    .build(),
            )
            .unwrap();
        assert_eq!(
            service.display_body(&dangling_note).unwrap().as_deref(),
            Some("Crash on start")
        );
    }

    #[test]
    fn concurrent_complete_has_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path().join("todos.db")).unwrap());
        let provider: Arc<dyn RepositoryProvider> = Arc::new(FakeProvider(HashMap::new()));
        let service = Arc::new(TodoService::new(
            store,
            Arc::clone(&provider),
            KeepAround::background(provider),
        ));
        let todo = service
            .create(&NewTodo::builder(Action::Assigned).user(1).project(1).issue(1).build())
            .unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || service.complete(todo.id))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(e) if e.is_invalid_transition()))
                .count(),
            1
        );
    }

    #[test]
    fn end_to_end_with_git_repository() {
        use todo_git::commands::git_dir_command;
        use todo_git::gitdir::{init_bare, repository_path};
        use todo_git::GitRepositoryProvider;

        let dir = tempfile::tempdir().unwrap();
        let repo_path = repository_path(dir.path(), 1);
        init_bare(&repo_path).unwrap();
        let empty = dir.path().join("empty");
        std::fs::write(&empty, b"").unwrap();
        let tree = git_dir_command(
            &repo_path,
            &["hash-object", "-w", "-t", "tree", &empty.display().to_string()],
        )
        .unwrap();
        let sha = git_dir_command(
            &repo_path,
            &[
                "-c",
                "user.name=Ada",
                "-c",
                "user.email=ada@example.com",
                "commit-tree",
                &tree,
                "-m",
                "Pipeline fix",
            ],
        )
        .unwrap();

        let provider: Arc<dyn RepositoryProvider> = Arc::new(GitRepositoryProvider::new(dir.path()));
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let service = TodoService::new(store, Arc::clone(&provider), KeepAround::inline(provider));

        let todo = service
            .create(
                &NewTodo::builder(Action::BuildFailed)
                    .user(1)
                    .project(1)
                    .commit(sha.clone())
                    .build(),
            )
            .unwrap();

        let kept = git_dir_command(&repo_path, &["for-each-ref", "--format=%(objectname)", "refs/keep-around"])
            .unwrap();
        assert_eq!(kept, sha);
        assert_eq!(
            service.target_reference(&todo).unwrap(),
            Some(sha[..8].to_string())
        );
        assert_eq!(
            service.display_body(&todo).unwrap().as_deref(),
            Some("Pipeline fix")
        );
    }
}
