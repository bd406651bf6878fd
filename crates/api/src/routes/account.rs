//! Route for the caller's own profile.

use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// ```text
/// GET /me  -> get_me
/// PUT /me  -> update_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me::get_me).put(me::update_me))
}
