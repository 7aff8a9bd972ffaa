//! SQLite-backed storage implementation.

mod entities;
mod labels;
mod queries;
pub mod schema;
mod store;
mod todos;

pub use store::SqliteStore;
