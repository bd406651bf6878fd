//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use taskflow_core::task_status::{TaskStatus, DEFAULT_PRIORITY};
use taskflow_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

const COLUMNS: &str = "id, title, description, assignee_ids, due_date, priority, project_id, \
                       status, created_by, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task in the `pending` state.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, assignee_ids, due_date, priority, project_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.assignee_ids)
            .bind(input.due_date)
            .bind(input.priority.as_deref().unwrap_or(DEFAULT_PRIORITY))
            .bind(input.project_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks matching `filter`, newest first. `None` filter fields
    /// match everything.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::uuid IS NULL OR project_id = $1)
               AND ($2::text IS NULL OR status = $2)
               AND ($3::uuid IS NULL OR $3 = ANY(assignee_ids))
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(filter.project_id)
            .bind(&filter.status)
            .bind(filter.assignee_id)
            .bind(clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Clearable fields use a provided flag so `Some(None)` writes NULL.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4::text ELSE description END,
                assignee_ids = COALESCE($5, assignee_ids),
                due_date = CASE WHEN $6 THEN $7::date ELSE due_date END,
                priority = COALESCE($8, priority),
                project_id = CASE WHEN $9 THEN $10::uuid ELSE project_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(&input.assignee_ids)
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(&input.priority)
            .bind(input.project_id.is_some())
            .bind(input.project_id.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Move a task from `from` to `to`.
    ///
    /// The update only applies while the row still holds `from`, so two
    /// concurrent transitions cannot both succeed. Returns `None` when the
    /// task is missing or its status changed underneath the caller.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: TaskStatus,
        to: TaskStatus,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task with its logs and comments. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
