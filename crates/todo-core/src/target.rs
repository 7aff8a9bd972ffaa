//! Entities a todo can point at.
//!
//! Issues and merge requests are stored rows; commits are fetched live from
//! the project's repository. All of them expose the same capability set
//! through [`TargetEntity`], and [`Target`] dispatches over the variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::TargetType;

/// Length of the abbreviated commit id.
pub const SHORT_SHA_LEN: usize = 8;

/// What callers can ask of any todo target.
pub trait TargetEntity {
    /// Human-readable title.
    fn title(&self) -> &str;

    /// Reference usable within the owning project (`#12`, `!4`, a full sha).
    fn to_reference(&self) -> String;

    /// Shortest unambiguous reference.
    fn short_reference(&self) -> String {
        self.to_reference()
    }

    /// Reference usable from any project (`group/project#12`).
    fn full_reference(&self) -> String;
}

/// An issue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    /// Project-scoped number.
    pub iid: i64,
    pub project_id: i64,
    pub project_path: String,
    pub title: String,
}

impl TargetEntity for Issue {
    fn title(&self) -> &str {
        &self.title
    }

    fn to_reference(&self) -> String {
        format!("#{}", self.iid)
    }

    fn full_reference(&self) -> String {
        format!("{}#{}", self.project_path, self.iid)
    }
}

/// A merge request row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: i64,
    pub iid: i64,
    pub project_id: i64,
    pub project_path: String,
    pub title: String,
}

impl TargetEntity for MergeRequest {
    fn title(&self) -> &str {
        &self.title
    }

    fn to_reference(&self) -> String {
        format!("!{}", self.iid)
    }

    fn full_reference(&self) -> String {
        format!("{}!{}", self.project_path, self.iid)
    }
}

/// A commit read from a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id.
    pub id: String,
    /// First line of the message.
    pub title: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
    /// Path of the project the commit was read from.
    #[serde(default)]
    pub project_path: String,
}

impl Commit {
    /// Abbreviated object id.
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(SHORT_SHA_LEN)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}

impl TargetEntity for Commit {
    fn title(&self) -> &str {
        &self.title
    }

    fn to_reference(&self) -> String {
        self.id.clone()
    }

    fn short_reference(&self) -> String {
        self.short_id().to_owned()
    }

    fn full_reference(&self) -> String {
        if self.project_path.is_empty() {
            self.id.clone()
        } else {
            format!("{}@{}", self.project_path, self.id)
        }
    }
}

/// A comment that may have triggered a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub project_id: i64,
    pub author_id: Option<i64>,
    pub body: String,
}

/// A resolved todo target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Issue(Issue),
    MergeRequest(MergeRequest),
    Commit(Commit),
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        match self {
            Self::Issue(_) => TargetType::Issue,
            Self::MergeRequest(_) => TargetType::MergeRequest,
            Self::Commit(_) => TargetType::Commit,
        }
    }

    fn entity(&self) -> &dyn TargetEntity {
        match self {
            Self::Issue(issue) => issue,
            Self::MergeRequest(mr) => mr,
            Self::Commit(commit) => commit,
        }
    }
}

impl TargetEntity for Target {
    fn title(&self) -> &str {
        self.entity().title()
    }

    fn to_reference(&self) -> String {
        self.entity().to_reference()
    }

    fn short_reference(&self) -> String {
        self.entity().short_reference()
    }

    fn full_reference(&self) -> String {
        self.entity().full_reference()
    }
}
