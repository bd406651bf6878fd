//! Repository for the `task_logs` table.

use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::task::{CreateTaskLog, TaskLog};

const COLUMNS: &str = "id, task_id, user_id, minutes, note, logged_on, created_at";

/// Time entries recorded against tasks.
pub struct TaskLogRepo;

impl TaskLogRepo {
    /// Record time spent by `user_id` on a task. `logged_on` falls back to
    /// the database's current date.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        input: &CreateTaskLog,
    ) -> Result<TaskLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_logs (task_id, user_id, minutes, note, logged_on)
             VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskLog>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(input.minutes)
            .bind(&input.note)
            .bind(input.logged_on)
            .fetch_one(pool)
            .await
    }

    /// All entries for a task, most recent day first.
    pub async fn list_for_task(pool: &PgPool, task_id: DbId) -> Result<Vec<TaskLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_logs
             WHERE task_id = $1
             ORDER BY logged_on DESC, created_at DESC"
        );
        sqlx::query_as::<_, TaskLog>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
