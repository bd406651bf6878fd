//! Aggregate rows for the dashboard statistics endpoint.

use serde::Serialize;
use sqlx::FromRow;

/// Task count for one status value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
