//! Note edit-access request model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::note_access::EditRequestStatus;
use taskflow_core::types::{DbId, Timestamp};

/// A row from the `note_edit_requests` table.
///
/// The token digest is skipped during serialization; clients only ever see
/// the plaintext token, once, in the approval response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NoteEditRequest {
    pub id: DbId,
    pub note_id: DbId,
    pub requester_name: String,
    pub requester_email: String,
    pub status: String,
    #[serde(skip_serializing)]
    pub edit_token_hash: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NoteEditRequest {
    /// Parse the stored status text. The column CHECK constraint keeps this
    /// infallible in practice; an unknown value is treated as `rejected`.
    pub fn status(&self) -> EditRequestStatus {
        self.status.parse().unwrap_or(EditRequestStatus::Rejected)
    }
}

/// DTO for filing a new request. Values are validated and normalized by the
/// caller.
#[derive(Debug, Clone)]
pub struct CreateNoteEditRequest {
    pub note_id: DbId,
    pub requester_name: String,
    pub requester_email: String,
}

/// Filters for the admin request list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditRequestFilter {
    pub status: Option<String>,
    pub note_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
