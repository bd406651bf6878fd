//! Handlers for the `/tasks` resource: CRUD, lifecycle, time logs, comments.
//!
//! Admins see and manage every task. Other users only see tasks they are
//! assigned to, and may only move them along the assignee steps of the
//! lifecycle (see `taskflow_core::task_status`).

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskflow_core::email_body::render_task_assigned;
use taskflow_core::error::CoreError;
use taskflow_core::task_status::{
    check_transition, validate_comment, validate_log_minutes, validate_priority,
    validate_task_title, Actor, TaskStatus,
};
use taskflow_core::types::DbId;
use taskflow_db::models::profile::ProfileSummary;
use taskflow_db::models::task::{
    CreateTask, CreateTaskComment, CreateTaskLog, Task, TaskComment, TaskFilter, TaskLog,
    UpdateTask,
};
use taskflow_db::repositories::{ProfileRepo, TaskCommentRepo, TaskLogRepo, TaskRepo};
use taskflow_events::OutgoingEmail;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notify::{current_year, dispatch, NotificationOutcome};
use crate::response::{DataResponse, NotifiedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validation(msg: String) -> AppError {
    AppError::Core(CoreError::Validation(msg))
}

async fn load_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}

fn ensure_can_access(user: &AuthUser, task: &Task) -> AppResult<()> {
    if user.is_admin() || task.is_assigned_to(user.user_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You are not assigned to this task".into(),
        )))
    }
}

/// Deduplicate `ids` and check that every id not in `current` names an
/// active profile. Returns the deduplicated ids and the newly added profiles.
async fn resolve_assignees(
    state: &AppState,
    ids: &[DbId],
    current: &[DbId],
) -> AppResult<(Vec<DbId>, Vec<ProfileSummary>)> {
    let mut seen = HashSet::new();
    let unique: Vec<DbId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
    let added: Vec<DbId> = unique
        .iter()
        .copied()
        .filter(|id| !current.contains(id))
        .collect();

    let profiles = ProfileRepo::active_summaries_by_ids(&state.pool, &added).await?;
    if profiles.len() != added.len() {
        let known: HashSet<DbId> = profiles.iter().map(|p| p.id).collect();
        let missing: Vec<String> = added
            .iter()
            .filter(|id| !known.contains(id))
            .map(|id| id.to_string())
            .collect();
        return Err(validation(format!(
            "Unknown or deactivated assignee id(s): {}",
            missing.join(", ")
        )));
    }
    Ok((unique, profiles))
}

async fn notify_assignees(
    state: &AppState,
    task: &Task,
    assignees: &[ProfileSummary],
) -> NotificationOutcome {
    let config = &state.config;
    let task_url = format!("{}/tasks/{}", config.public_app_url, task.id);
    let due = task.due_date.map(|d| d.format("%Y-%m-%d").to_string());

    let emails: Vec<OutgoingEmail> = assignees
        .iter()
        .map(|a| {
            let rendered = render_task_assigned(
                &config.app_name,
                &task.title,
                due.as_deref(),
                &task_url,
                current_year(),
            );
            OutgoingEmail::new(a.email.clone(), Some(a.full_name.clone()), rendered)
        })
        .collect();

    dispatch(&state.mailer, &emails).await
}

/// Apply a lifecycle step after checking it against the status graph.
async fn transition(state: &AppState, task: &Task, to: TaskStatus, actor: Actor) -> AppResult<Task> {
    let from: TaskStatus = task
        .status
        .parse()
        .map_err(|e: String| AppError::InternalError(e))?;
    check_transition(task.id, from, to, actor)?;

    let updated = TaskRepo::set_status(&state.pool, task.id, from, to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Task {} was changed by someone else; reload and try again",
                task.id
            )))
        })?;

    tracing::info!(task_id = %task.id, from = %from, to = %to, "Task status changed");
    Ok(updated)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks
///
/// Admins may filter by project, status, and assignee. Other users always
/// get only their own assignments.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    if let Some(status) = &params.status {
        status.parse::<TaskStatus>().map_err(validation)?;
    }

    let assignee_id = if user.is_admin() {
        params.assignee_id
    } else {
        Some(user.user_id)
    };

    let filter = TaskFilter {
        project_id: params.project_id,
        status: params.status,
        assignee_id,
        limit: params.limit,
        offset: params.offset,
    };
    let tasks = TaskRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
///
/// Creates a `pending` task and emails each assignee.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<NotifiedResponse<Task>>)> {
    validate_task_title(&input.title).map_err(validation)?;
    if let Some(priority) = &input.priority {
        validate_priority(priority).map_err(validation)?;
    }
    let (assignee_ids, assignees) = resolve_assignees(&state, &input.assignee_ids, &[]).await?;
    input.title = input.title.trim().to_string();
    input.assignee_ids = assignee_ids;

    let task = TaskRepo::create(&state.pool, admin.user_id, &input).await?;
    tracing::info!(task_id = %task.id, assignees = task.assignee_ids.len(), "Task created");

    let notification = notify_assignees(&state, &task, &assignees).await;
    Ok((
        StatusCode::CREATED,
        Json(NotifiedResponse {
            data: task,
            notification,
        }),
    ))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load_task(&state, id).await?;
    ensure_can_access(&user, &task)?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
///
/// Newly added assignees are emailed; existing ones are not.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTask>,
) -> AppResult<Json<NotifiedResponse<Task>>> {
    if let Some(title) = &input.title {
        validate_task_title(title).map_err(validation)?;
        input.title = Some(title.trim().to_string());
    }
    if let Some(priority) = &input.priority {
        validate_priority(priority).map_err(validation)?;
    }

    let before = load_task(&state, id).await?;
    let mut added = Vec::new();
    if let Some(ids) = &input.assignee_ids {
        let (unique, profiles) = resolve_assignees(&state, ids, &before.assignee_ids).await?;
        added = profiles;
        input.assignee_ids = Some(unique);
    }

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    let notification = notify_assignees(&state, &task, &added).await;
    Ok(Json(NotifiedResponse {
        data: task,
        notification,
    }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TaskRepo::delete(&state.pool, id).await? {
        tracing::info!(task_id = %id, user_id = %admin.user_id, "Task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    let to: TaskStatus = input.status.parse().map_err(validation)?;
    let task = load_task(&state, id).await?;
    ensure_can_access(&user, &task)?;

    let updated = transition(&state, &task, to, user.actor()).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/tasks/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load_task(&state, id).await?;
    let updated = transition(&state, &task, TaskStatus::Approved, Actor::Admin).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/tasks/{id}/reject
///
/// Sends a completed task back to `in_progress`.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load_task(&state, id).await?;
    let updated = transition(&state, &task, TaskStatus::InProgress, Actor::Admin).await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Time logs and comments
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks/{id}/logs
pub async fn list_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskLog>>>> {
    let task = load_task(&state, id).await?;
    ensure_can_access(&user, &task)?;
    let logs = TaskLogRepo::list_for_task(&state.pool, id).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// POST /api/v1/tasks/{id}/logs
pub async fn create_log(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateTaskLog>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskLog>>)> {
    validate_log_minutes(input.minutes).map_err(validation)?;
    let task = load_task(&state, id).await?;
    ensure_can_access(&user, &task)?;

    let log = TaskLogRepo::create(&state.pool, id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}

/// GET /api/v1/tasks/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskComment>>>> {
    let task = load_task(&state, id).await?;
    ensure_can_access(&user, &task)?;
    let comments = TaskCommentRepo::list_for_task(&state.pool, id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/tasks/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<CreateTaskComment>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskComment>>)> {
    validate_comment(&input.body).map_err(validation)?;
    input.body = input.body.trim().to_string();
    let task = load_task(&state, id).await?;
    ensure_can_access(&user, &task)?;

    let comment = TaskCommentRepo::create(&state.pool, id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
