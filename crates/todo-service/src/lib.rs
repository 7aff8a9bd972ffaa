//! Todo operations for the notification store.
//!
//! [`TodoService`] ties a storage backend to the project repositories that
//! serve commit targets. It owns the keep-around side effect and the derived
//! accessors (resolved target, display body, reference).

pub mod error;
pub mod keep_around;
pub mod service;

pub use error::TodoError;
pub use keep_around::KeepAround;
pub use service::TodoService;
