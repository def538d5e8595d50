use std::collections::BTreeMap;
use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parkhub_core::error::CoreError;
use serde_json::json;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

static EXPOSE_DETAIL: OnceLock<bool> = OnceLock::new();

/// Decide once, at startup, whether 500 responses carry the underlying error
/// as `detail`. Unset means no.
pub fn expose_error_detail(expose: bool) {
    let _ = EXPOSE_DETAIL.set(expose);
}

fn detail_enabled() -> bool {
    EXPOSE_DETAIL.get().copied().unwrap_or(false)
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{success: false, message, code}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level failures from a `#[derive(Validate)]` request body.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::Core(CoreError::not_found(entity))
    }

    pub fn rule(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::rule(msg))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Conflict(msg.into()))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Unauthorized(msg.into()))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Core(CoreError::Forbidden(msg.into()))
    }
}

/// Status, machine code and client message for one error.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
    errors: Option<serde_json::Value>,
    detail: Option<String>,
}

impl Rendered {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            errors: None,
            detail: None,
        }
    }

    fn internal(detail: String) -> Self {
        tracing::error!(error = %detail, "Internal error");
        Self {
            detail: Some(detail),
            ..Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE,
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Validation(msg) => {
                    Rendered::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => {
                    Rendered::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    Rendered::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    Rendered::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                }
                CoreError::BusinessRule(msg) => {
                    Rendered::new(StatusCode::BAD_REQUEST, "BUSINESS_RULE", msg.clone())
                }
                CoreError::Internal(msg) => Rendered::internal(msg.clone()),
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Validation(errors) => Rendered {
                errors: Some(field_errors(errors)),
                ..Rendered::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed",
                )
            },

            AppError::BadRequest(msg) => {
                Rendered::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => Rendered::internal(msg.clone()),
        };

        let mut body = json!({
            "success": false,
            "message": rendered.message,
            "code": rendered.code,
        });
        if let Some(errors) = rendered.errors {
            body["errors"] = errors;
        }
        if let Some(detail) = rendered.detail.filter(|_| detail_enabled()) {
            body["detail"] = json!(detail);
        }

        (rendered.status, axum::Json(body)).into_response()
    }
}

/// `{field: [message, ...]}` for every failing field, in field order.
fn field_errors(errors: &validator::ValidationErrors) -> serde_json::Value {
    let map: BTreeMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    json!(map)
}

/// Client message for a violated `uq_` constraint.
fn unique_violation_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" => "User with this email already exists".into(),
        "uq_parkings_code" => "Parking with this code already exists".into(),
        "uq_tickets_car_entry_id" => "Ticket already exists for this entry".into(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Classify a sqlx error.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (`23505`) on `uq_` constraints map to 409.
/// - CHECK (`23514`) and foreign key (`23503`) violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Rendered {
    match err {
        sqlx::Error::RowNotFound => {
            Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => Rendered::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    unique_violation_message(constraint),
                ),
                Some("23514") => Rendered::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates constraint: {constraint}"),
                ),
                Some("23503") => Rendered::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Referenced record does not exist",
                ),
                _ => Rendered::internal(db_err.to_string()),
            }
        }
        other => Rendered::internal(other.to_string()),
    }
}
