//! Converts the typed use-case errors from `gns3-controller-ports` into
//! JSON HTTP responses. The teacher has no single place that does this
//! — each handler returns `StatusCode` or `impl IntoResponse` ad hoc —
//! but every error type it and the rest of the pack define already
//! carries an [`ErrorCode`] and, here, a [`CoreError`] kind, so a single
//! wrapper is the natural seam rather than repeating a match per route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gns3_controller_ports::{CoreError, CoreErrorKind};
use gns3_domain_types::ErrorCode;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// Wraps any typed use-case error for return from a handler, e.g.
/// `result.map_err(ApiError::from)?`.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl<E> From<E> for ApiError
where
    E: CoreError + ErrorCode + std::fmt::Display,
{
    fn from(err: E) -> Self {
        let status = StatusCode::from_u16(err.kind().http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl ApiError {
    pub fn new(kind: CoreErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { code: self.code, message: self.message };
        (self.status, Json(body)).into_response()
    }
}
