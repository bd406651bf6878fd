//! Task, time-log, and comment models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

use super::clearable;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub assignee_ids: Vec<DbId>,
    pub due_date: Option<NaiveDate>,
    pub priority: String,
    pub project_id: Option<DbId>,
    pub status: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn is_assigned_to(&self, user_id: DbId) -> bool {
        self.assignee_ids.contains(&user_id)
    }
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_ids: Vec<DbId>,
    pub due_date: Option<NaiveDate>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<String>,
    pub project_id: Option<DbId>,
}

/// DTO for updating a task. All fields are optional; `status` is changed
/// through the dedicated transition endpoints, never here.
///
/// `description`, `due_date`, and `project_id` are cleared by sending `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    pub assignee_ids: Option<Vec<DbId>>,
    #[serde(default, deserialize_with = "clearable")]
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub project_id: Option<Option<DbId>>,
}

/// Filters for task listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row from the `task_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskLog {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub minutes: i32,
    pub note: Option<String>,
    pub logged_on: NaiveDate,
    pub created_at: Timestamp,
}

/// DTO for recording time against a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskLog {
    pub minutes: i32,
    pub note: Option<String>,
    /// Defaults to the current date if omitted.
    pub logged_on: Option<NaiveDate>,
}

/// A row from the `task_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskComment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

/// DTO for posting a comment on a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskComment {
    pub body: String,
}
