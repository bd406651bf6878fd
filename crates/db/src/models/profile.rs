//! Profile (user account) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// Full row from the `profiles` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`ProfileResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe profile representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<&Profile> for ProfileResponse {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name.clone(),
            email: p.email.clone(),
            role: p.role.clone(),
            avatar_url: p.avatar_url.clone(),
            position: p.position.clone(),
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

/// Minimal author/assignee info embedded in other responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileSummary {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// DTO for creating a new profile. The password is already hashed.
#[derive(Debug)]
pub struct CreateProfile {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub position: Option<String>,
}

/// DTO for updating a profile. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub avatar_url: Option<String>,
    pub position: Option<String>,
    pub is_active: Option<bool>,
}
