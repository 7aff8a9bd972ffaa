//! Todo creation rules.

use crate::enums::{Action, TargetType};
use crate::todo::{NewTodo, TargetRef};

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("action is required")]
    ActionRequired,

    #[error("user is required")]
    UserRequired,

    #[error("project is required")]
    ProjectRequired,

    #[error("target type is required")]
    TargetTypeRequired,

    #[error("target id is required for {0} targets")]
    TargetIdRequired(String),

    #[error("commit id is required for commit targets")]
    CommitIdRequired,
}

/// The fields of a [`NewTodo`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTodo {
    pub action: Action,
    pub author_id: Option<i64>,
    pub user_id: i64,
    pub project_id: i64,
    pub target: TargetRef,
    pub note_id: Option<i64>,
}

/// Validates creation input and returns its typed form.
///
/// `target_id` is required unless the target is a commit; a commit target
/// needs a non-blank `commit_id` instead. The field not used by the target
/// kind is ignored.
pub fn validate(new: &NewTodo) -> Result<ValidTodo, ValidationError> {
    let action = new.action.ok_or(ValidationError::ActionRequired)?;
    let user_id = new.user_id.ok_or(ValidationError::UserRequired)?;
    let project_id = new.project_id.ok_or(ValidationError::ProjectRequired)?;
    let target_type = match new.target_type {
        Some(ref t) if t.is_valid() => t.clone(),
        _ => return Err(ValidationError::TargetTypeRequired),
    };

    let target = target_ref_from_parts(target_type, new.target_id, new.commit_id.as_deref())?;

    Ok(ValidTodo {
        action,
        author_id: new.author_id,
        user_id,
        project_id,
        target,
        note_id: new.note_id,
    })
}

/// Builds a [`TargetRef`] from the persisted column triple.
pub fn target_ref_from_parts(
    target_type: TargetType,
    target_id: Option<i64>,
    commit_id: Option<&str>,
) -> Result<TargetRef, ValidationError> {
    if target_type == TargetType::Commit {
        match commit_id.map(str::trim) {
            Some(sha) if !sha.is_empty() => Ok(TargetRef::commit(sha)),
            _ => Err(ValidationError::CommitIdRequired),
        }
    } else {
        match target_id {
            Some(id) => Ok(TargetRef::Entity { target_type, id }),
            None => Err(ValidationError::TargetIdRequired(
                target_type.as_str().to_owned(),
            )),
        }
    }
}
