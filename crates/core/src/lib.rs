//! Domain types, validation rules, and state machines for TaskFlow.
//!
//! This crate performs no I/O. The database and HTTP layers depend on it for
//! shared id types, the [`error::CoreError`] enum, and the rules that decide
//! whether a write is allowed.

pub mod email_body;
pub mod error;
pub mod note_access;
pub mod notes;
pub mod pagination;
pub mod roles;
pub mod task_status;
pub mod types;
pub mod validation;
