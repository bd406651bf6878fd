//! Aggregate queries behind the dashboard statistics endpoint.

use chrono::NaiveDate;
use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::dashboard::StatusCount;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Task counts grouped by status. With `assignee_id`, only tasks
    /// assigned to that user are counted.
    pub async fn task_status_counts(
        pool: &PgPool,
        assignee_id: Option<DbId>,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM tasks
             WHERE ($1::uuid IS NULL OR $1 = ANY(assignee_ids))
             GROUP BY status
             ORDER BY status",
        )
        .bind(assignee_id)
        .fetch_all(pool)
        .await
    }

    /// Total minutes logged on or after `since`, optionally for one user.
    pub async fn minutes_logged_since(
        pool: &PgPool,
        since: NaiveDate,
        user_id: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(minutes), 0)::BIGINT FROM task_logs
             WHERE logged_on >= $1
               AND ($2::uuid IS NULL OR user_id = $2)",
        )
        .bind(since)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
