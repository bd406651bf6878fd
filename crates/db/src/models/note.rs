//! Note model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    /// Rich-text HTML from the editor.
    pub content: String,
    pub admin_id: DbId,
    pub recipient_user_ids: Vec<DbId>,
    pub category: String,
    pub visibility: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Note {
    pub fn has_recipient(&self, user_id: DbId) -> bool {
        self.recipient_user_ids.contains(&user_id)
    }
}

/// The subset of a note exposed to a token holder.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditableNote {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub updated_at: Timestamp,
}

/// DTO for creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub recipient_user_ids: Vec<DbId>,
    /// Defaults to `general` if omitted.
    pub category: Option<String>,
    /// Defaults to `recipients` if omitted.
    pub visibility: Option<String>,
}

/// DTO for an admin edit. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub recipient_user_ids: Option<Vec<DbId>>,
    pub category: Option<String>,
    pub visibility: Option<String>,
}
