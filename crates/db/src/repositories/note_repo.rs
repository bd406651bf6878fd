//! Repository for the `notes` table, including the token-gated edit path.

use sqlx::PgPool;
use taskflow_core::notes::{
    DEFAULT_CATEGORY, DEFAULT_VISIBILITY, VISIBILITY_PUBLIC, VISIBILITY_RECIPIENTS,
};
use taskflow_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use taskflow_core::types::DbId;

use crate::models::note::{CreateNote, EditableNote, Note, UpdateNote};

const COLUMNS: &str = "id, title, content, admin_id, recipient_user_ids, category, visibility, \
                       created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a note owned by `admin_id`.
    pub async fn create(
        pool: &PgPool,
        admin_id: DbId,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (title, content, admin_id, recipient_user_ids, category, visibility)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(admin_id)
            .bind(&input.recipient_user_ids)
            .bind(input.category.as_deref().unwrap_or(DEFAULT_CATEGORY))
            .bind(input.visibility.as_deref().unwrap_or(DEFAULT_VISIBILITY))
            .fetch_one(pool)
            .await
    }

    /// Find a note by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every note, most recently updated first.
    pub async fn list_all(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes ORDER BY updated_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Notes a non-admin may read: `recipients` notes listing `user_id`,
    /// plus every `public` note. `private` notes are admin-only.
    pub async fn list_visible_to(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE (visibility = $2 AND $1 = ANY(recipient_user_ids))
                OR visibility = $3
             ORDER BY updated_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(user_id)
            .bind(VISIBILITY_RECIPIENTS)
            .bind(VISIBILITY_PUBLIC)
            .bind(clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Admin edit. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                recipient_user_ids = COALESCE($4, recipient_user_ids),
                category = COALESCE($5, category),
                visibility = COALESCE($6, visibility)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.recipient_user_ids)
            .bind(&input.category)
            .bind(&input.visibility)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the editable view of a note for a token holder.
    ///
    /// Returns `None` unless an `approved` request on this note carries
    /// `token_hash`.
    pub async fn find_editable_by_token(
        pool: &PgPool,
        note_id: DbId,
        token_hash: &str,
    ) -> Result<Option<EditableNote>, sqlx::Error> {
        sqlx::query_as::<_, EditableNote>(
            "SELECT n.id, n.title, n.content, n.updated_at
             FROM notes n
             JOIN note_edit_requests r ON r.note_id = n.id
             WHERE n.id = $1
               AND r.edit_token_hash = $2
               AND r.status = 'approved'",
        )
        .bind(note_id)
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Replace a note's content on behalf of a token holder.
    ///
    /// The matching approved request is locked `FOR SHARE` before the
    /// update, so a concurrent revocation either completes first (and this
    /// returns `None`) or waits until the edit commits.
    pub async fn update_content_with_token(
        pool: &PgPool,
        note_id: DbId,
        token_hash: &str,
        content: &str,
    ) -> Result<Option<EditableNote>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let approved: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM note_edit_requests
             WHERE note_id = $1
               AND edit_token_hash = $2
               AND status = 'approved'
             FOR SHARE",
        )
        .bind(note_id)
        .bind(token_hash)
        .fetch_optional(&mut *tx)
        .await?;

        if approved.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let note = sqlx::query_as::<_, EditableNote>(
            "UPDATE notes SET content = $2
             WHERE id = $1
             RETURNING id, title, content, updated_at",
        )
        .bind(note_id)
        .bind(content)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(note)
    }
}
