//! TaskFlow API server library.
//!
//! Exposes config, state, error handling, auth, and the route tree so the
//! binary entrypoint and the integration tests build the exact same app.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
