//! Handlers for `/admin/users` (account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskflow_core::error::CoreError;
use taskflow_core::roles::{validate_role, ROLE_USER};
use taskflow_core::types::DbId;
use taskflow_core::validation::{
    normalize_email, validate_email, validate_name, validate_password_strength,
    MIN_PASSWORD_LENGTH,
};
use taskflow_db::models::profile::{CreateProfile, ProfileResponse, UpdateProfile};
use taskflow_db::repositories::{ProfileRepo, SessionRepo};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `user`.
    pub role: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub position: Option<String>,
    pub is_active: Option<bool>,
}

fn validation(msg: String) -> AppError {
    AppError::Core(CoreError::Validation(msg))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Profile",
        id,
    })
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProfileResponse>>)> {
    validate_name(&input.full_name).map_err(validation)?;
    validate_email(&input.email).map_err(validation)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH).map_err(validation)?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    validate_role(&role).map_err(validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            full_name: input.full_name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash,
            role,
            position: input.position,
        },
    )
    .await?;

    tracing::info!(user_id = %profile.id, created_by = %admin.user_id, role = %profile.role, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProfileResponse::from(&profile),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ProfileResponse>>>> {
    let profiles = ProfileRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse {
        data: profiles.iter().map(ProfileResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(&profile),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// An admin cannot demote or deactivate their own account, so the system
/// is never left without an admin by accident.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    if let Some(name) = &input.full_name {
        validate_name(name).map_err(validation)?;
    }
    if let Some(email) = &input.email {
        validate_email(email).map_err(validation)?;
    }
    if let Some(role) = &input.role {
        validate_role(role).map_err(validation)?;
    }
    if id == admin.user_id
        && (input.is_active == Some(false) || input.role.as_deref().is_some_and(|r| r != admin.role))
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot demote or deactivate your own account".into(),
        )));
    }

    let deactivating = input.is_active == Some(false);
    let update = UpdateProfile {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        email: input.email.as_deref().map(normalize_email),
        role: input.role,
        avatar_url: input.avatar_url,
        position: input.position,
        is_active: input.is_active,
    };
    let profile = ProfileRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    if deactivating {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    Ok(Json(DataResponse {
        data: ProfileResponse::from(&profile),
    }))
}

/// POST /api/v1/admin/users/{id}/deactivate
///
/// Soft-deactivates the account and revokes its sessions. Returns 204.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }

    if !ProfileRepo::deactivate(&state.pool, id).await? {
        // Either missing or already inactive.
        ProfileRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = %id, deactivated_by = %admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
