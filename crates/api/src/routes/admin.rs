//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin_users, note_access, notes};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                              -> list_users
/// POST   /users                              -> create_user
/// GET    /users/{id}                         -> get_user
/// PUT    /users/{id}                         -> update_user
/// POST   /users/{id}/deactivate              -> deactivate_user
///
/// GET    /notes                              -> admin_list
/// POST   /notes                              -> admin_create
/// GET    /notes/{id}                         -> admin_get
/// POST   /notes/{id}                         -> admin_update
/// PUT    /notes/{id}                         -> admin_update
/// POST   /notes/{id}/send                    -> admin_send
/// GET    /notes/{id}/edit-requests           -> list_for_note
///
/// GET    /note-edit-requests                 -> list_requests
/// POST   /note-edit-requests/{id}/approve    -> approve
/// POST   /note-edit-requests/{id}/reject     -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(admin_users::list_users).post(admin_users::create_user),
        )
        .route(
            "/users/{id}",
            get(admin_users::get_user).put(admin_users::update_user),
        )
        .route(
            "/users/{id}/deactivate",
            post(admin_users::deactivate_user),
        )
        .route("/notes", get(notes::admin_list).post(notes::admin_create))
        .route(
            "/notes/{id}",
            get(notes::admin_get)
                .post(notes::admin_update)
                .put(notes::admin_update),
        )
        .route("/notes/{id}/send", post(notes::admin_send))
        .route(
            "/notes/{id}/edit-requests",
            get(note_access::list_for_note),
        )
        .route("/note-edit-requests", get(note_access::list_requests))
        .route(
            "/note-edit-requests/{id}/approve",
            post(note_access::approve),
        )
        .route("/note-edit-requests/{id}/reject", post(note_access::reject))
}
