//! Core types for the todo notification store.
//!
//! Todos are action items directed at a user about an event on a project
//! entity (issue, merge request or commit). This crate holds the domain
//! model, the `pending -> done` state machine, input validation and the
//! traits for the repository collaborator that serves commit targets.

pub mod enums;
pub mod filter;
pub mod repository;
pub mod state;
pub mod target;
pub mod todo;
pub mod validation;
