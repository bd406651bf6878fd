//! Handler for the dashboard statistics endpoint.

use axum::extract::State;
use axum::Json;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use taskflow_db::models::dashboard::StatusCount;
use taskflow_db::repositories::{DashboardRepo, NoteEditRequestRepo, ProfileRepo, ProjectRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Counts shown on the dashboard.
///
/// For non-admins, task counts and logged minutes cover only the caller's
/// own work, and the user and edit-request counts are omitted.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub tasks_by_status: Vec<StatusCount>,
    pub total_tasks: i64,
    pub projects: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_edit_requests: Option<i64>,
    pub week_start: NaiveDate,
    pub minutes_logged_this_week: i64,
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let pool = &state.pool;
    let is_admin = user.is_admin();
    let scope = (!is_admin).then_some(user.user_id);
    let since = week_start(Utc::now().date_naive());

    let (tasks_by_status, minutes, projects, users, pending) = tokio::try_join!(
        DashboardRepo::task_status_counts(pool, scope),
        DashboardRepo::minutes_logged_since(pool, since, scope),
        ProjectRepo::count(pool),
        async {
            if is_admin {
                ProfileRepo::count(pool).await.map(Some)
            } else {
                Ok(None)
            }
        },
        async {
            if is_admin {
                NoteEditRequestRepo::count_pending(pool).await.map(Some)
            } else {
                Ok(None)
            }
        },
    )?;

    let total_tasks = tasks_by_status.iter().map(|c| c.count).sum();
    Ok(Json(DataResponse {
        data: DashboardStats {
            tasks_by_status,
            total_tasks,
            projects,
            users,
            pending_edit_requests: pending,
            week_start: since,
            minutes_logged_this_week: minutes,
        },
    }))
}
