//! Handlers for the note edit-access workflow.
//!
//! The public half (request access, open the edit page, submit an edit)
//! needs no account; the edit token in the link is the only credential.
//! The admin half reviews requests.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskflow_core::email_body::{render_edit_access_approved, render_edit_request_received};
use taskflow_core::error::CoreError;
use taskflow_core::note_access::{
    check_transition, edit_url, ensure_no_open_request, hash_edit_token, is_plausible_token,
    mint_edit_token, EditRequestStatus, INVALID_TOKEN_MESSAGE, NOTE_MISSING_MESSAGE,
};
use taskflow_core::notes::validate_note_content;
use taskflow_core::types::DbId;
use taskflow_core::validation::{normalize_email, parse_id, validate_email, validate_name};
use taskflow_db::models::note::EditableNote;
use taskflow_db::models::note_edit_request::{
    CreateNoteEditRequest, EditRequestFilter, NoteEditRequest,
};
use taskflow_db::repositories::{NoteEditRequestRepo, NoteRepo, ProfileRepo};
use taskflow_events::OutgoingEmail;

use crate::error::{is_db_code, is_unique_violation, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::notify::{current_year, dispatch, NotificationOutcome};
use crate::query::{EditTokenQuery, PaginationParams};
use crate::response::{DataResponse, NotifiedResponse};
use crate::state::AppState;

const OPEN_REQUEST_INDEX: &str = "uq_note_edit_requests_open";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EditAccessRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitEditRequest {
    pub content: String,
    pub edit_token: String,
}

/// Query parameters for `GET /admin/note-edit-requests`.
#[derive(Debug, Deserialize)]
pub struct RequestListParams {
    pub status: Option<String>,
    pub note_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Approval result. `edit_token` is the only time the plaintext is shown.
#[derive(Debug, Serialize)]
pub struct ApprovedRequest {
    pub request: NoteEditRequest,
    pub edit_token: String,
    pub edit_url: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validation(msg: String) -> AppError {
    AppError::Core(CoreError::Validation(msg))
}

fn invalid_token() -> AppError {
    AppError::Core(CoreError::Forbidden(INVALID_TOKEN_MESSAGE.to_string()))
}

fn parse_note_id(raw: &str) -> AppResult<DbId> {
    parse_id("note_id", raw).map_err(AppError::BadRequest)
}

async fn load_request(state: &AppState, id: DbId) -> AppResult<NoteEditRequest> {
    NoteEditRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Edit request",
            id,
        }))
}

/// Email the note's owner about a new request. Lookup errors are logged
/// and treated like a failed send.
async fn notify_owner(state: &AppState, request: &NoteEditRequest) {
    let owner = async {
        let Some(note) = NoteRepo::find_by_id(&state.pool, request.note_id).await? else {
            return Ok(None);
        };
        let owner = ProfileRepo::active_summaries_by_ids(&state.pool, &[note.admin_id])
            .await?
            .into_iter()
            .next();
        Ok::<_, sqlx::Error>(owner.map(|o| (note, o)))
    }
    .await;

    let (note, owner) = match owner {
        Ok(Some(found)) => found,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(request_id = %request.id, error = %e, "Could not look up note owner");
            return;
        }
    };

    let review_url = format!(
        "{}/admin/notes/{}/edit-requests",
        state.config.public_app_url, note.id
    );
    let rendered = render_edit_request_received(
        &state.config.app_name,
        &note.title,
        &request.requester_name,
        &request.requester_email,
        &review_url,
        current_year(),
    );
    let email = OutgoingEmail::new(owner.email, Some(owner.full_name), rendered);
    dispatch(&state.mailer, &[email]).await;
}

/// Email the edit link to an approved requester.
///
/// Runs after the approval has committed, so a failed note lookup is
/// reported as a notification warning instead of an error. The caller
/// still returns the token.
async fn notify_approved(
    state: &AppState,
    request: &NoteEditRequest,
    url: &str,
) -> NotificationOutcome {
    let note = match NoteRepo::find_by_id(&state.pool, request.note_id).await {
        Ok(Some(note)) => note,
        Ok(None) => {
            return NotificationOutcome::not_sent(
                "The note no longer exists; the edit link was not emailed.",
            )
        }
        Err(e) => {
            tracing::warn!(request_id = %request.id, error = %e, "Could not load note for approval email");
            return NotificationOutcome::not_sent(
                "The edit link could not be emailed. Share it with the requester directly.",
            );
        }
    };

    let rendered = render_edit_access_approved(
        &state.config.app_name,
        &note.title,
        &request.requester_name,
        url,
        current_year(),
    );
    let email = OutgoingEmail::new(
        request.requester_email.clone(),
        Some(request.requester_name.clone()),
        rendered,
    );
    dispatch(&state.mailer, &[email]).await
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// POST /api/v1/public/notes/{note_id}/edit-requests
pub async fn request_access(
    State(state): State<AppState>,
    Path(raw_note_id): Path<String>,
    Json(input): Json<EditAccessRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<NoteEditRequest>>)> {
    let note_id = parse_note_id(&raw_note_id)?;
    validate_name(&input.name).map_err(validation)?;
    validate_email(&input.email).map_err(validation)?;
    let email = normalize_email(&input.email);

    let existing = NoteEditRequestRepo::open_statuses_for(&state.pool, note_id, &email).await?;
    ensure_no_open_request(&existing)?;

    let create = CreateNoteEditRequest {
        note_id,
        requester_name: input.name.trim().to_string(),
        requester_email: email,
    };
    let request = match NoteEditRequestRepo::create(&state.pool, &create).await {
        Ok(request) => request,
        Err(e) if is_db_code(&e, "23503") => {
            return Err(AppError::NotFound(NOTE_MISSING_MESSAGE.to_string()));
        }
        Err(e) if is_unique_violation(&e, OPEN_REQUEST_INDEX) => {
            // Lost a race with an identical request; report it the same way.
            let existing =
                NoteEditRequestRepo::open_statuses_for(&state.pool, note_id, &create.requester_email)
                    .await?;
            ensure_no_open_request(&existing)?;
            return Err(AppError::Database(e));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(request_id = %request.id, note_id = %note_id, "Edit access requested");
    notify_owner(&state, &request).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/public/notes/{note_id}/edit?token=
pub async fn open_for_edit(
    State(state): State<AppState>,
    Path(raw_note_id): Path<String>,
    Query(query): Query<EditTokenQuery>,
) -> AppResult<Json<DataResponse<EditableNote>>> {
    let note_id = parse_note_id(&raw_note_id)?;
    let token = query.token.unwrap_or_default();
    if !is_plausible_token(&token) {
        return Err(invalid_token());
    }

    let note = NoteRepo::find_editable_by_token(&state.pool, note_id, &hash_edit_token(&token))
        .await?
        .ok_or_else(invalid_token)?;
    Ok(Json(DataResponse { data: note }))
}

/// POST /api/v1/public/notes/{note_id}/edit
///
/// The token stays valid after use until the approval is revoked.
pub async fn submit_edit(
    State(state): State<AppState>,
    Path(raw_note_id): Path<String>,
    Json(input): Json<SubmitEditRequest>,
) -> AppResult<Json<DataResponse<EditableNote>>> {
    let note_id = parse_note_id(&raw_note_id)?;
    if !is_plausible_token(&input.edit_token) {
        return Err(invalid_token());
    }
    validate_note_content(&input.content).map_err(validation)?;

    let note = NoteRepo::update_content_with_token(
        &state.pool,
        note_id,
        &hash_edit_token(&input.edit_token),
        &input.content,
    )
    .await?
    .ok_or_else(invalid_token)?;

    tracing::info!(note_id = %note_id, "Note edited through edit link");
    Ok(Json(DataResponse { data: note }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/note-edit-requests
pub async fn list_requests(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<RequestListParams>,
) -> AppResult<Json<DataResponse<Vec<NoteEditRequest>>>> {
    if let Some(status) = &params.status {
        status.parse::<EditRequestStatus>().map_err(validation)?;
    }
    let filter = EditRequestFilter {
        status: params.status,
        note_id: params.note_id,
        limit: params.limit,
        offset: params.offset,
    };
    let requests = NoteEditRequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/admin/notes/{id}/edit-requests
pub async fn list_for_note(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(note_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<NoteEditRequest>>>> {
    let filter = EditRequestFilter {
        note_id: Some(note_id),
        limit: params.limit,
        offset: params.offset,
        ..Default::default()
    };
    let requests = NoteEditRequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/admin/note-edit-requests/{id}/approve
///
/// Mints a fresh token and emails the edit link to the requester.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<NotifiedResponse<ApprovedRequest>>> {
    let current = load_request(&state, id).await?;
    check_transition(id, current.status(), EditRequestStatus::Approved)?;

    let token = mint_edit_token();
    let request = NoteEditRequestRepo::approve(&state.pool, id, admin.user_id, &token.hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Edit request {id} was reviewed by someone else; reload and try again"
            )))
        })?;
    let url = edit_url(&state.config.public_app_url, request.note_id, &token.plaintext);
    tracing::info!(request_id = %id, note_id = %request.note_id, admin_id = %admin.user_id, "Edit request approved");

    let notification = notify_approved(&state, &request, &url).await;

    Ok(Json(NotifiedResponse {
        data: ApprovedRequest {
            request,
            edit_token: token.plaintext,
            edit_url: url,
        },
        notification,
    }))
}

/// POST /api/v1/admin/note-edit-requests/{id}/reject
///
/// Rejecting an approved request revokes its edit link.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<NoteEditRequest>>> {
    let current = load_request(&state, id).await?;
    let from = current.status();
    check_transition(id, from, EditRequestStatus::Rejected)?;

    let request = NoteEditRequestRepo::reject(&state.pool, id, admin.user_id, from)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Edit request {id} was reviewed by someone else; reload and try again"
            )))
        })?;
    tracing::info!(request_id = %id, from = %from, admin_id = %admin.user_id, "Edit request rejected");
    Ok(Json(DataResponse { data: request }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskflow_core::roles::ROLE_ADMIN;
    use taskflow_db::models::note::CreateNote;
    use taskflow_db::models::profile::CreateProfile;
    use taskflow_db::DbPool;
    use taskflow_events::Mailer;

    use super::*;
    use crate::auth::jwt::JwtConfig;
    use crate::config::ServerConfig;

    fn state(pool: DbPool) -> AppState {
        AppState {
            pool,
            config: Arc::new(ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                cors_origins: vec![],
                request_timeout_secs: 30,
                public_app_url: "http://app.test".into(),
                app_name: "TaskFlow".into(),
                allow_public_signup: false,
                jwt: JwtConfig {
                    secret: "unit-test-secret".into(),
                    access_token_expiry_mins: 15,
                    refresh_token_expiry_days: 7,
                },
            }),
            mailer: Arc::new(Mailer::simulated()),
        }
    }

    async fn approved_request(pool: &DbPool) -> NoteEditRequest {
        let admin = ProfileRepo::create(
            pool,
            &CreateProfile {
                full_name: "Admin".into(),
                email: "admin@example.com".into(),
                password_hash: "not-a-real-hash".into(),
                role: ROLE_ADMIN.into(),
                position: None,
            },
        )
        .await
        .unwrap();
        let note = NoteRepo::create(
            pool,
            admin.id,
            &CreateNote {
                title: "Roadmap".into(),
                content: "<p>old</p>".into(),
                recipient_user_ids: vec![],
                category: None,
                visibility: None,
            },
        )
        .await
        .unwrap();
        let request = NoteEditRequestRepo::create(
            pool,
            &CreateNoteEditRequest {
                note_id: note.id,
                requester_name: "Jane".into(),
                requester_email: "jane@x.com".into(),
            },
        )
        .await
        .unwrap();
        NoteEditRequestRepo::approve(pool, request.id, admin.id, &mint_edit_token().hash)
            .await
            .unwrap()
            .unwrap()
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn approval_email_is_sent(pool: DbPool) {
        let request = approved_request(&pool).await;
        let outcome = notify_approved(&state(pool), &request, "http://app.test/x").await;
        assert_eq!(outcome.attempted, 1);
        assert_eq!(outcome.simulated, 1);
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn note_lookup_failure_becomes_a_warning(pool: DbPool) {
        let request = approved_request(&pool).await;
        pool.close().await;

        let outcome = notify_approved(&state(pool), &request, "http://app.test/x").await;
        assert_eq!(outcome.attempted, 0);
        assert!(outcome.warning.unwrap().contains("could not be emailed"));
    }
}
