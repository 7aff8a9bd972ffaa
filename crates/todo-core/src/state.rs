//! The todo state machine.
//!
//! Two states, one event. The allowed moves live in [`TRANSITIONS`]; storage
//! backends apply them with a compare-and-swap on the current state so the
//! check and the write cannot interleave with another caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::enums::UnknownVariant;

/// Lifecycle state of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    Pending,
    Done,
}

/// Events that move a todo between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoEvent {
    /// The user handled the todo.
    Done,
}

/// `(from, event, to)` triples. Anything not listed is rejected.
pub const TRANSITIONS: &[(State, TodoEvent, State)] =
    &[(State::Pending, TodoEvent::Done, State::Done)];

/// A transition that is not in [`TRANSITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event:?} to a todo that is {from}")]
pub struct TransitionError {
    pub from: State,
    pub event: TodoEvent,
}

impl State {
    /// The state every todo starts in.
    pub const INITIAL: State = State::Pending;

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }

    /// Returns the state reached by applying `event`, or an error when the
    /// move is not allowed from `self`.
    pub fn apply(self, event: TodoEvent) -> Result<State, TransitionError> {
        TRANSITIONS
            .iter()
            .find(|(from, ev, _)| *from == self && *ev == event)
            .map(|(_, _, to)| *to)
            .ok_or(TransitionError { from: self, event })
    }

    /// States from which `event` may be applied. Storage uses this to build
    /// the guard of its conditional update.
    pub fn sources_of(event: TodoEvent) -> impl Iterator<Item = State> {
        TRANSITIONS
            .iter()
            .filter(move |(_, ev, _)| *ev == event)
            .map(|(from, _, _)| *from)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            _ => Err(UnknownVariant::new("state", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_to_done_is_allowed() {
        assert_eq!(State::Pending.apply(TodoEvent::Done), Ok(State::Done));
    }

    #[test]
    fn done_rejects_done() {
        let err = State::Done.apply(TodoEvent::Done).unwrap_err();
        assert_eq!(err.from, State::Done);
        assert_eq!(err.to_string(), "cannot apply Done to a todo that is done");
    }

    #[test]
    fn sources_of_done() {
        let sources: Vec<State> = State::sources_of(TodoEvent::Done).collect();
        assert_eq!(sources, vec![State::Pending]);
    }

    #[test]
    fn initial_state_is_pending() {
        assert_eq!(State::INITIAL, State::Pending);
        assert_eq!(State::default(), State::Pending);
    }

    #[test]
    fn parse_state() {
        assert_eq!("Pending".parse::<State>().unwrap(), State::Pending);
        assert_eq!("done".parse::<State>().unwrap(), State::Done);
        assert!("archived".parse::<State>().is_err());
    }
}
