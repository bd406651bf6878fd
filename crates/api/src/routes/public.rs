//! Unauthenticated routes for the note edit-link flow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::note_access;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// `{note_id}` is taken as a raw string so a malformed id yields a 400 with
/// the standard error body.
///
/// ```text
/// POST /notes/{note_id}/edit-requests   -> request_access
/// GET  /notes/{note_id}/edit?token=     -> open_for_edit
/// POST /notes/{note_id}/edit            -> submit_edit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/notes/{note_id}/edit-requests",
            post(note_access::request_access),
        )
        .route(
            "/notes/{note_id}/edit",
            get(note_access::open_for_edit).post(note_access::submit_edit),
        )
}
