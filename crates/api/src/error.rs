use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};
use taskflow_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error", "code" }` JSON bodies
/// (plus `"fields"` for per-field validation failures).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request-body validation failures from `#[derive(Validate)]` DTOs.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A 404 with a caller-supplied message, for lookups that are not keyed
    /// by a single entity id.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;

        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Validation(errors) => {
                fields = Some(field_messages(errors));
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "One or more fields are invalid".to_string(),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(fields) = fields {
            body["fields"] = fields;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Flatten `ValidationErrors` into `{ field: [message, ...] }`.
fn field_messages(errors: &validator::ValidationErrors) -> Value {
    let mut out = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| {
                let text = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", e.code));
                Value::String(text)
            })
            .collect();
        out.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(out)
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// | Postgres code | Meaning                 | Response                      |
/// |---------------|-------------------------|-------------------------------|
/// | `23505`       | unique violation (`uq_`) | 409                          |
/// | `23503`       | foreign-key violation   | 404, referenced row missing   |
/// | `42501`       | insufficient privilege  | 403, message forwarded        |
/// | `42703`       | undefined column        | 500, schema out of date       |
///
/// `RowNotFound` maps to 404; everything else is a sanitized 500.
pub fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint == "uq_profiles_email" {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        "A user with this email already exists".to_string(),
                    );
                }
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                internal(db_err)
            }
            Some("23503") => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "A referenced record does not exist".to_string(),
            ),
            Some("42501") => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                db_err.message().to_string(),
            ),
            Some("42703") => {
                tracing::error!(error = %db_err, "Query references a missing column");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCHEMA_OUT_OF_DATE",
                    "The database schema is out of date. Run the latest migrations.".to_string(),
                )
            }
            _ => internal(db_err),
        },
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

fn internal(db_err: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %db_err, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Whether `err` is a Postgres error with the given SQLSTATE code.
pub fn is_db_code(err: &sqlx::Error, code: &str) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(code))
}

/// Whether `err` is a unique violation on `constraint`.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
    )
}
