//! Repository for the `task_comments` table.

use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::task::{CreateTaskComment, TaskComment};

const COLUMNS: &str = "id, task_id, user_id, body, created_at";

pub struct TaskCommentRepo;

impl TaskCommentRepo {
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        input: &CreateTaskComment,
    ) -> Result<TaskComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_comments (task_id, user_id, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskComment>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Comments on a task in posting order.
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<TaskComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_comments WHERE task_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, TaskComment>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
