//! Handlers for the `/auth` resource (login, refresh, logout, signup).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taskflow_core::error::CoreError;
use taskflow_core::roles::ROLE_USER;
use taskflow_core::validation::normalize_email;
use taskflow_db::models::profile::{CreateProfile, Profile, ProfileResponse};
use taskflow_db::models::session::CreateSession;
use taskflow_db::repositories::{ProfileRepo, SessionRepo};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// Tokens plus the signed-in profile.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: ProfileResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    input.validate()?;

    let profile = ProfileRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())))?;

    let valid = verify_password(&input.password, &profile.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = %profile.id, "Failed login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())));
    }

    if !profile.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let data = issue_tokens(&state, &profile).await?;
    tracing::info!(user_id = %profile.id, "User logged in");
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented session is revoked and a new
/// one is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let profile = ProfileRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !profile.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let data = issue_tokens(&state, &profile).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/auth/logout
///
/// Revokes every session of the caller. Returns 204.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    tracing::info!(user_id = %user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/signup
///
/// Self-service registration with the `user` role. Only available when
/// `ALLOW_PUBLIC_SIGNUP` is enabled.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    if !state.config.allow_public_signup {
        return Err(AppError::Core(CoreError::Forbidden(
            "Public sign-up is disabled. Ask an administrator for an account.".into(),
        )));
    }
    input.validate()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            full_name: input.full_name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash,
            role: ROLE_USER.to_string(),
            position: None,
        },
    )
    .await?;
    tracing::info!(user_id = %profile.id, "User signed up");

    let data = issue_tokens(&state, &profile).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign an access token, persist a refresh session, and build the response.
async fn issue_tokens(state: &AppState, profile: &Profile) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(profile.id, &profile.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: profile.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: ProfileResponse::from(profile),
    })
}
