use std::sync::Arc;

use taskflow_events::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once in `main` (or by the test harness) and injected; handlers
/// never reach for global clients.
#[derive(Clone)]
pub struct AppState {
    pub pool: taskflow_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub mailer: Arc<Mailer>,
}
