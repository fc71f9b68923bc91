//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`mediashelf_common::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on catalog calls.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mediashelf_common::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0 {
            Error::LibraryNotFound(_) | Error::PathNotAccessible { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self.0 {
            Error::LibraryNotFound(_) => "library_not_found",
            Error::PathNotAccessible { .. } => "path_not_accessible",
            Error::ProviderUnavailable(_) => "provider_unavailable",
            Error::EmptyMatch(_) => "empty_match",
            Error::Format { .. } => "format_error",
            Error::IconNotFound(_) => "icon_not_found",
            Error::Timeout { .. } => "timeout",
            Error::Config(_) => "config_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in API handler");
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
        }

        let body = json!({
            "error": self.0.to_string(),
            "code": self.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
