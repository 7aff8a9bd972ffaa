//! Best-effort pinning of commits referenced by todos.
//!
//! A dispatch never fails the operation that triggered it: a missing
//! repository or a failing `keep_around` call is logged and dropped.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use todo_core::repository::RepositoryProvider;

struct Job {
    project_id: i64,
    sha: String,
}

enum Mode {
    Disabled,
    Inline(Arc<dyn RepositoryProvider>),
    Background {
        sender: Option<mpsc::Sender<Job>>,
        worker: Option<JoinHandle<()>>,
    },
}

/// Dispatches keep-around requests to project repositories.
pub struct KeepAround {
    mode: Mode,
}

impl KeepAround {
    /// Runs keep-around on the caller's thread.
    ///
    /// The triggering `create` or `complete` does not return until the git
    /// subprocesses finish. Errors are still swallowed. Use
    /// [`KeepAround::background`] when the caller must not wait on git.
    pub fn inline(provider: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            mode: Mode::Inline(provider),
        }
    }

    /// Runs keep-around on a dedicated worker thread fed by an unbounded
    /// queue. Falls back to inline dispatch if the thread cannot be spawned.
    pub fn background(provider: Arc<dyn RepositoryProvider>) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let worker_provider = Arc::clone(&provider);
        let spawned = std::thread::Builder::new()
            .name("keep-around".into())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    run(worker_provider.as_ref(), &job);
                }
                debug!("keep-around worker stopped");
            });

        match spawned {
            Ok(worker) => Self {
                mode: Mode::Background {
                    sender: Some(sender),
                    worker: Some(worker),
                },
            },
            Err(e) => {
                warn!(error = %e, "failed to spawn keep-around worker, dispatching inline");
                Self::inline(provider)
            }
        }
    }

    /// Drops every request.
    pub fn disabled() -> Self {
        Self {
            mode: Mode::Disabled,
        }
    }

    /// Requests that `sha` be kept around in the project's repository.
    pub fn dispatch(&self, project_id: i64, sha: &str) {
        match &self.mode {
            Mode::Disabled => {}
            Mode::Inline(provider) => run(provider.as_ref(), &Job {
                project_id,
                sha: sha.to_string(),
            }),
            Mode::Background { sender, .. } => {
                let job = Job {
                    project_id,
                    sha: sha.to_string(),
                };
                let sent = sender.as_ref().map(|s| s.send(job));
                if !matches!(sent, Some(Ok(()))) {
                    warn!(project_id, sha, "keep-around worker gone, request dropped");
                }
            }
        }
    }

    /// Waits for queued requests to finish and stops the worker.
    ///
    /// Dispatches made afterwards are dropped with a warning.
    pub fn shutdown(&mut self) {
        if let Mode::Background { sender, worker } = &mut self.mode {
            drop(sender.take());
            if let Some(handle) = worker.take() {
                if handle.join().is_err() {
                    warn!("keep-around worker panicked");
                }
            }
        }
    }
}

impl Drop for KeepAround {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for KeepAround {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            Mode::Disabled => "disabled",
            Mode::Inline(_) => "inline",
            Mode::Background { .. } => "background",
        };
        f.debug_struct("KeepAround").field("mode", &mode).finish()
    }
}

fn run(provider: &dyn RepositoryProvider, job: &Job) {
    let Some(repo) = provider.repository(job.project_id) else {
        warn!(
            project_id = job.project_id,
            sha = %job.sha,
            "no repository for project, keep-around skipped"
        );
        return;
    };
    match repo.keep_around(&job.sha) {
        Ok(()) => debug!(project_id = job.project_id, sha = %job.sha, "commit kept around"),
        Err(e) => warn!(
            project_id = job.project_id,
            sha = %job.sha,
            error = %e,
            "keep-around failed"
        ),
    }
}
