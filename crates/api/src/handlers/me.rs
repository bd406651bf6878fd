//! Handlers for `/me`, the signed-in user's own profile.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use taskflow_core::error::CoreError;
use taskflow_core::validation::validate_name;
use taskflow_db::models::profile::{ProfileResponse, UpdateProfile};
use taskflow_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fields a user may change on their own profile. Role, email, and
/// activation are admin-managed.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub position: Option<String>,
}

/// GET /api/v1/me
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(&profile),
    }))
}

/// PUT /api/v1/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    if let Some(name) = &input.full_name {
        validate_name(name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let update = UpdateProfile {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        avatar_url: input.avatar_url,
        position: input.position,
        ..Default::default()
    };
    let profile = ProfileRepo::update(&state.pool, user.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(&profile),
    }))
}
