use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use magicgen_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce small HTML error pages, since
/// every consumer of this surface is a browser.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `magicgen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A template rendering error from minijinja.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A filesystem error (output folder creation, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    tracing::debug!(entity = %entity, id = %id, "Lookup failed");
                    (StatusCode::NOT_FOUND, format!("{entity} not found"))
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Rendering / filesystem errors ---
            AppError::Template(err) => {
                tracing::error!(error = %err, "Template rendering failed");
                internal_error()
            }
            AppError::Io(err) => {
                tracing::error!(error = %err, "Filesystem error");
                internal_error()
            }
        };

        // The message never echoes user input (prompts, path ids), so it
        // is safe to interpolate into markup directly.
        let body = format!(
            "<main class=\"container\"><h1>{}</h1><p>{message}</p></main>",
            status.as_u16()
        );
        (status, Html(body)).into_response()
    }
}

/// Generic 500 pairing; detail stays in the log, not the body.
fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique/primary-key violations (SQLite codes 1555 and 2067) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            if matches!(db_err.code().as_deref(), Some("1555") | Some("2067")) {
                return (
                    StatusCode::CONFLICT,
                    "Duplicate value violates a unique constraint".to_string(),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
