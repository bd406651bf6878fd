//! Handlers for notes: the admin authoring surface and the recipient view.

use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use taskflow_core::email_body::render_note_email;
use taskflow_core::error::CoreError;
use taskflow_core::notes::{
    can_view_note, validate_category, validate_note_content, validate_note_title,
    validate_visibility,
};
use taskflow_core::types::DbId;
use taskflow_db::models::note::{CreateNote, Note, UpdateNote};
use taskflow_db::models::profile::ProfileSummary;
use taskflow_db::repositories::{NoteRepo, ProfileRepo};
use taskflow_events::OutgoingEmail;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notify::{current_year, dispatch};
use crate::query::PaginationParams;
use crate::response::{DataResponse, NotifiedResponse};
use crate::state::AppState;

/// A note with its author's profile.
#[derive(Debug, Serialize)]
pub struct NoteWithAuthor {
    #[serde(flatten)]
    pub note: Note,
    pub author: Option<ProfileSummary>,
}

/// A note with its author and resolved recipients.
#[derive(Debug, Serialize)]
pub struct NoteDetail {
    #[serde(flatten)]
    pub note: Note,
    pub author: Option<ProfileSummary>,
    pub recipients: Vec<ProfileSummary>,
}

fn validation(msg: String) -> AppError {
    AppError::Core(CoreError::Validation(msg))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Note", id })
}

async fn load_note(state: &AppState, id: DbId) -> AppResult<Note> {
    NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Deduplicate recipient ids. Ids not already in `current` must name an
/// active profile.
async fn check_recipients(
    state: &AppState,
    ids: &[DbId],
    current: &[DbId],
) -> AppResult<Vec<DbId>> {
    let mut seen = HashSet::new();
    let unique: Vec<DbId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
    let added: Vec<DbId> = unique
        .iter()
        .copied()
        .filter(|id| !current.contains(id))
        .collect();

    let found = ProfileRepo::active_summaries_by_ids(&state.pool, &added).await?;
    if found.len() != added.len() {
        return Err(validation(format!(
            "{} recipient id(s) do not match any active user",
            added.len() - found.len()
        )));
    }
    Ok(unique)
}

/// Attach author summaries with one follow-up query for the whole page.
async fn with_authors(state: &AppState, notes: Vec<Note>) -> AppResult<Vec<NoteWithAuthor>> {
    let mut author_ids: Vec<DbId> = notes.iter().map(|n| n.admin_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<DbId, ProfileSummary> =
        ProfileRepo::summaries_by_ids(&state.pool, &author_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

    Ok(notes
        .into_iter()
        .map(|note| {
            let author = authors.get(&note.admin_id).cloned();
            NoteWithAuthor { note, author }
        })
        .collect())
}

async fn detail(state: &AppState, note: Note) -> AppResult<NoteDetail> {
    let (authors, recipients) = tokio::try_join!(
        ProfileRepo::summaries_by_ids(&state.pool, std::slice::from_ref(&note.admin_id)),
        ProfileRepo::summaries_by_ids(&state.pool, &note.recipient_user_ids),
    )?;
    Ok(NoteDetail {
        author: authors.into_iter().next(),
        recipients,
        note,
    })
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/notes
pub async fn admin_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<NoteWithAuthor>>>> {
    let notes = NoteRepo::list_all(&state.pool, params.limit, params.offset).await?;
    let data = with_authors(&state, notes).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/notes
pub async fn admin_create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    validate_note_title(&input.title).map_err(validation)?;
    validate_note_content(&input.content).map_err(validation)?;
    if let Some(category) = &input.category {
        validate_category(category).map_err(validation)?;
    }
    if let Some(visibility) = &input.visibility {
        validate_visibility(visibility).map_err(validation)?;
    }
    input.title = input.title.trim().to_string();
    input.recipient_user_ids = check_recipients(&state, &input.recipient_user_ids, &[]).await?;

    let note = NoteRepo::create(&state.pool, admin.user_id, &input).await?;
    tracing::info!(
        note_id = %note.id,
        admin_id = %admin.user_id,
        recipients = note.recipient_user_ids.len(),
        "Note created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/v1/admin/notes/{id}
pub async fn admin_get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NoteDetail>>> {
    let note = load_note(&state, id).await?;
    let data = detail(&state, note).await?;
    Ok(Json(DataResponse { data }))
}

/// POST or PUT /api/v1/admin/notes/{id}
pub async fn admin_update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateNote>,
) -> AppResult<Json<DataResponse<Note>>> {
    if let Some(title) = &input.title {
        validate_note_title(title).map_err(validation)?;
        input.title = Some(title.trim().to_string());
    }
    if let Some(content) = &input.content {
        validate_note_content(content).map_err(validation)?;
    }
    if let Some(category) = &input.category {
        validate_category(category).map_err(validation)?;
    }
    if let Some(visibility) = &input.visibility {
        validate_visibility(visibility).map_err(validation)?;
    }
    if let Some(ids) = &input.recipient_user_ids {
        let before = load_note(&state, id).await?;
        input.recipient_user_ids =
            Some(check_recipients(&state, ids, &before.recipient_user_ids).await?);
    }

    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(note_id = %id, admin_id = %admin.user_id, "Note updated");
    Ok(Json(DataResponse { data: note }))
}

/// POST /api/v1/admin/notes/{id}/send
///
/// Emails the note to every recipient. The response always succeeds once
/// the note exists; per-recipient failures are reported in `notification`.
pub async fn admin_send(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<NotifiedResponse<NoteDetail>>> {
    let note = load_note(&state, id).await?;
    if note.recipient_user_ids.is_empty() {
        return Err(validation("Note has no recipients to send to".into()));
    }

    let active = ProfileRepo::active_summaries_by_ids(&state.pool, &note.recipient_user_ids).await?;
    let detail = detail(&state, note).await?;
    let author_name = detail
        .author
        .as_ref()
        .map(|a| a.full_name.as_str())
        .unwrap_or(state.config.app_name.as_str());
    let year = current_year();

    // Deactivated recipients stay on the note but are not emailed.
    let emails: Vec<OutgoingEmail> = active
        .iter()
        .map(|r| {
            let rendered = render_note_email(
                &state.config.app_name,
                &detail.note.title,
                &detail.note.content,
                author_name,
                year,
            );
            OutgoingEmail::new(r.email.clone(), Some(r.full_name.clone()), rendered)
        })
        .collect();

    let notification = dispatch(&state.mailer, &emails).await;
    tracing::info!(
        note_id = %id,
        admin_id = %admin.user_id,
        sent = notification.sent,
        failed = notification.failed,
        "Note sent",
    );
    Ok(Json(NotifiedResponse {
        data: detail,
        notification,
    }))
}

// ---------------------------------------------------------------------------
// Recipient view
// ---------------------------------------------------------------------------

/// GET /api/v1/notes
///
/// Notes addressed to the caller, plus public notes.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<NoteWithAuthor>>>> {
    let notes =
        NoteRepo::list_visible_to(&state.pool, user.user_id, params.limit, params.offset).await?;
    let data = with_authors(&state, notes).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/notes/{id}
///
/// A note the caller may not read is reported as missing.
pub async fn get_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NoteWithAuthor>>> {
    let note = load_note(&state, id).await?;
    if !can_view_note(&note.visibility, &user.role, note.has_recipient(user.user_id)) {
        return Err(not_found(id));
    }
    let data = with_authors(&state, vec![note])
        .await?
        .pop()
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data }))
}
