//! Repository for the `note_edit_requests` table.
//!
//! Rows are never deleted. Status changes are conditional on the status
//! the caller observed, so concurrent reviews cannot overwrite each other.

use sqlx::PgPool;
use taskflow_core::note_access::EditRequestStatus;
use taskflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use taskflow_core::types::DbId;

use crate::models::note_edit_request::{
    CreateNoteEditRequest, EditRequestFilter, NoteEditRequest,
};

const COLUMNS: &str = "id, note_id, requester_name, requester_email, status, edit_token_hash, \
                       reviewed_by, reviewed_at, created_at, updated_at";

pub struct NoteEditRequestRepo;

impl NoteEditRequestRepo {
    /// File a new `pending` request.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNoteEditRequest,
    ) -> Result<NoteEditRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO note_edit_requests (note_id, requester_name, requester_email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NoteEditRequest>(&query)
            .bind(input.note_id)
            .bind(&input.requester_name)
            .bind(&input.requester_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NoteEditRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM note_edit_requests WHERE id = $1");
        sqlx::query_as::<_, NoteEditRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Statuses of every open (`pending` or `approved`) request filed by
    /// `email` for `note_id`. The email match is case-insensitive.
    pub async fn open_statuses_for(
        pool: &PgPool,
        note_id: DbId,
        email: &str,
    ) -> Result<Vec<EditRequestStatus>, sqlx::Error> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT status FROM note_edit_requests
             WHERE note_id = $1
               AND lower(requester_email) = lower($2)
               AND status IN ('pending', 'approved')",
        )
        .bind(note_id)
        .bind(email)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().filter_map(|s| s.parse().ok()).collect())
    }

    /// List requests, newest first, optionally filtered by status and note.
    pub async fn list(
        pool: &PgPool,
        filter: &EditRequestFilter,
    ) -> Result<Vec<NoteEditRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM note_edit_requests
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::uuid IS NULL OR note_id = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, NoteEditRequest>(&query)
            .bind(&filter.status)
            .bind(filter.note_id)
            .bind(clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Approve a `pending` request and attach a freshly minted token digest.
    ///
    /// Returns `None` if the request is missing or is no longer pending.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
        token_hash: &str,
    ) -> Result<Option<NoteEditRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE note_edit_requests SET
                status = 'approved',
                edit_token_hash = $3,
                reviewed_by = $2,
                reviewed_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NoteEditRequest>(&query)
            .bind(id)
            .bind(reviewer_id)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Reject a request currently in `from`, clearing any token digest.
    ///
    /// Rejecting an `approved` request revokes its edit link. Returns `None`
    /// if the request is missing or its status is no longer `from`.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
        from: EditRequestStatus,
    ) -> Result<Option<NoteEditRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE note_edit_requests SET
                status = 'rejected',
                edit_token_hash = NULL,
                reviewed_by = $2,
                reviewed_at = NOW()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NoteEditRequest>(&query)
            .bind(id)
            .bind(reviewer_id)
            .bind(from.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Number of requests awaiting review.
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM note_edit_requests WHERE status = 'pending'")
            .fetch_one(pool)
            .await
    }
}
