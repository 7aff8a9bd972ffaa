//! Enum types for todos.
//!
//! [`TargetType`] keeps the string-backed shape used for persisted kinds
//! (known variants plus an `Other(String)` fallback); [`Action`] and
//! [`SortOrder`] are closed sets.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + a catch-all fallback.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, custom_variant = $custom_variant:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            $custom_variant(String),
        }

        impl $name {
            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::$custom_variant(s) => s.as_str(),
                }
            }

            /// Returns `true` for known variants and any non-empty custom string.
            pub fn is_valid(&self) -> bool {
                match self {
                    Self::$custom_variant(s) => !s.trim().is_empty(),
                    _ => true,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::$custom_variant(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $str => Self::$variant, )+
                    _ => Self::$custom_variant(s),
                }
            }
        }
    };
}

// ===========================================================================
// TargetType
// ===========================================================================

define_enum! {
    /// Kind of entity a todo points at.
    ///
    /// `Commit` is not a stored entity: commits are fetched live from the
    /// project's repository.
    TargetType, custom_variant = Other,
    variants: [
        (Issue, "Issue"),
        (MergeRequest, "MergeRequest"),
        (Commit, "Commit"),
    ]
}

impl TargetType {
    /// Kinds whose labels rank todos in priority order.
    pub const LABEL_PRIORITY_KINDS: [TargetType; 2] =
        [TargetType::Issue, TargetType::MergeRequest];

    /// Returns `true` for kinds that can carry label priorities.
    pub fn has_label_priority(&self) -> bool {
        Self::LABEL_PRIORITY_KINDS.contains(self)
    }

    /// Parses the spellings accepted on the command line (`issue`, `mr`, ...).
    pub fn parse_loose(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "issue" => Self::Issue,
            "mr" | "merge_request" | "merge-request" | "mergerequest" => Self::MergeRequest,
            "commit" => Self::Commit,
            _ => Self::from(s),
        }
    }
}

// ===========================================================================
// Action
// ===========================================================================

/// The event that produced a todo.
///
/// Codes are persisted and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Assigned,
    Mentioned,
    BuildFailed,
    Marked,
    ApprovalRequired,
}

impl Action {
    /// All actions in code order.
    pub const ALL: [Action; 5] = [
        Action::Assigned,
        Action::Mentioned,
        Action::BuildFailed,
        Action::Marked,
        Action::ApprovalRequired,
    ];

    /// Returns the persisted numeric code.
    pub fn code(self) -> i32 {
        match self {
            Self::Assigned => 1,
            Self::Mentioned => 2,
            Self::BuildFailed => 3,
            Self::Marked => 4,
            Self::ApprovalRequired => 5,
        }
    }

    /// Looks up an action by its persisted code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.code() == code)
    }

    /// Returns the symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Mentioned => "mentioned",
            Self::BuildFailed => "build_failed",
            Self::Marked => "marked",
            Self::ApprovalRequired => "approval_required",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i32>() {
            return Self::from_code(code).ok_or_else(|| UnknownVariant::new("action", s));
        }
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|a| a.name() == normalized)
            .ok_or_else(|| UnknownVariant::new("action", s))
    }
}

// ===========================================================================
// SortOrder
// ===========================================================================

/// Ordering for todo list queries. Every query names one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest first (descending id).
    Recency,
    /// Highest label priority first, nulls last, then oldest first.
    Priority,
    CreatedAsc,
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recency => "recency",
            Self::Priority => "priority",
            Self::CreatedAsc => "created_asc",
            Self::CreatedDesc => "created_desc",
            Self::UpdatedAsc => "updated_asc",
            Self::UpdatedDesc => "updated_desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "recency" | "recent" | "id_desc" | "newest" => Ok(Self::Recency),
            "priority" | "label_priority" => Ok(Self::Priority),
            "created_asc" | "oldest" => Ok(Self::CreatedAsc),
            "created_desc" => Ok(Self::CreatedDesc),
            "updated_asc" => Ok(Self::UpdatedAsc),
            "updated_desc" => Ok(Self::UpdatedDesc),
            _ => Err(UnknownVariant::new("sort order", s)),
        }
    }
}

/// Returned when parsing an unknown enum spelling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
