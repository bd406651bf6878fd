//! Route definitions for the recipient view of `/notes`.

use axum::routing::get;
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET /       -> list_mine
/// GET /{id}   -> get_mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_mine))
        .route("/{id}", get(notes::get_mine))
}
