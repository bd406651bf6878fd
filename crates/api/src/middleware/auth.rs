//! JWT-based authentication extractor for Axum handlers.
//!
//! The token proves identity only. Role and active state are read from
//! `profiles` on each request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taskflow_core::error::CoreError;
use taskflow_core::roles::ROLE_ADMIN;
use taskflow_core::task_status::Actor;
use taskflow_core::types::DbId;
use taskflow_db::repositories::ProfileRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated profile extracted from a `Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// The task-lifecycle actor this user acts as.
    pub fn actor(&self) -> Actor {
        if self.is_admin() {
            Actor::Admin
        } else {
            Actor::Assignee
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Deactivation and role changes apply to tokens already issued.
        let (role, is_active) = ProfileRepo::find_access(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;
        if !is_active {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is deactivated".into(),
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}
