//! Helper types and traits for cleaner route handlers.
//!
//! Every failure leaves a handler as an [`ApiError`], rendered as a JSON
//! `{ "error": message }` body. Core errors map to 404 when the document is
//! unknown and to 500 otherwise; routes opt into 400 explicitly for input
//! rejected at admission.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdf_workshop_core::ErrorKind;
use serde::Serialize;
use tracing::{error, warn};

/// Standard result type for route handlers.
pub type RouteResult<T> = Result<T, ApiError>;

/// An HTTP status paired with a client-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

/// An unknown or expired document id is a 404 on every route, including the
/// edit, merge and compress routes. Everything else that reaches this
/// conversion is a server-side failure.
impl From<pdf_workshop_core::Error> for ApiError {
    fn from(e: pdf_workshop_core::Error) -> Self {
        let status = match e.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        } else {
            warn!("Request rejected ({}): {}", self.status, self.message);
        }
        (self.status, Json(ErrorBody { error: &self.message })).into_response()
    }
}

/// Extension trait for converting `Option<T>` to `RouteResult<T>`.
pub trait OptionExt<T> {
    /// Returns the contained value or a 400 Bad Request error.
    fn or_bad_request(self, msg: &str) -> RouteResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_bad_request(self, msg: &str) -> RouteResult<T> {
        self.ok_or_else(|| ApiError::bad_request(msg))
    }
}

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Converts the error to 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;

    /// Converts the error to 400 Bad Request.
    fn or_bad_request(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| ApiError::internal(e.to_string()))
    }

    fn or_bad_request(self) -> RouteResult<T> {
        self.map_err(|e| ApiError::bad_request(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pdf_workshop_core::Error;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(Error::NotFound("abc".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_core_errors_map_to_500() {
        for e in [
            Error::InvalidPageIndex { index: 9, total: 2 },
            Error::InvalidArgument("pageIndex".to_string()),
            Error::InvalidFormat("Only PDFs are allowed.".to_string()),
            Error::ExternalTool("exited with code 1".to_string()),
        ] {
            assert_eq!(ApiError::from(e).status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<u8> = None;
        assert_eq!(
            missing.or_bad_request("No file uploaded").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
