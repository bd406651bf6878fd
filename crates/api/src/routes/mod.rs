pub mod account;
pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notes;
pub mod projects;
pub mod public;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/signup                                     signup (public, when enabled)
///
/// /me                                              get, update own profile
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update
/// /admin/users/{id}/deactivate                     deactivate (POST)
/// /admin/notes                                     list, create
/// /admin/notes/{id}                                get, update (POST or PUT)
/// /admin/notes/{id}/send                           email recipients (POST)
/// /admin/notes/{id}/edit-requests                  requests for one note
/// /admin/note-edit-requests                        list (?status, note_id)
/// /admin/note-edit-requests/{id}/approve           approve, mint token (POST)
/// /admin/note-edit-requests/{id}/reject            reject or revoke (POST)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
///
/// /tasks                                           list, create
/// /tasks/{id}                                      get, update, delete
/// /tasks/{id}/status                               assignee transition (POST)
/// /tasks/{id}/approve                              completed -> approved (POST)
/// /tasks/{id}/reject                               completed -> in_progress (POST)
/// /tasks/{id}/logs                                 list, create
/// /tasks/{id}/comments                             list, create
///
/// /notes                                           recipient view
/// /notes/{id}                                      get one visible note
///
/// /dashboard/stats                                 counts (GET)
///
/// /public/notes/{note_id}/edit-requests            request edit access (POST)
/// /public/notes/{note_id}/edit                     open (GET ?token=), submit (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(account::router())
        .nest("/admin", admin::router())
        .nest("/projects", projects::router())
        .nest("/tasks", tasks::router())
        .nest("/notes", notes::router())
        .nest("/dashboard", dashboard::router())
        .nest("/public", public::router())
}
