//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create (admin)
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update (admin)
/// DELETE /{id}              -> delete (admin)
/// POST   /{id}/status       -> change_status
/// POST   /{id}/approve      -> approve (admin)
/// POST   /{id}/reject       -> reject (admin)
/// GET    /{id}/logs         -> list_logs
/// POST   /{id}/logs         -> create_log
/// GET    /{id}/comments     -> list_comments
/// POST   /{id}/comments     -> create_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route(
            "/{id}",
            get(tasks::get_by_id)
                .put(tasks::update)
                .delete(tasks::delete),
        )
        .route("/{id}/status", post(tasks::change_status))
        .route("/{id}/approve", post(tasks::approve))
        .route("/{id}/reject", post(tasks::reject))
        .route("/{id}/logs", get(tasks::list_logs).post(tasks::create_log))
        .route(
            "/{id}/comments",
            get(tasks::list_comments).post(tasks::create_comment),
        )
}
