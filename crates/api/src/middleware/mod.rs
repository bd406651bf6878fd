//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- any signed-in profile (row scope is enforced by
//!   the handler).
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//!
//! Public endpoints take neither.

pub mod auth;
pub mod rbac;
