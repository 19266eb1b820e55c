//! Error taxonomy for request handling.
//!
//! # Design Decisions
//! - Validation and not-found outcomes are recovered locally with a
//!   flash-carrying redirect; they are not exceptions
//! - Storage and unhandled faults surface as a generic error page; raw
//!   fault text never reaches the caller
//! - The instrumentation wrapper branches on these variants to decide
//!   span status, exception counting, and log level

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::catalog::StorageError;
use crate::http::pages;

/// Outcome classification for a handler body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required form field was blank after trimming.
    #[error("field '{field}' is required")]
    Validation { field: &'static str },

    /// Detail lookup missed; a domain-expected outcome.
    #[error("no course found with code '{code}'")]
    NotFound { code: String },

    /// Request reached no configured route.
    #[error("no route for path '{path}'")]
    RouteNotFound { path: String },

    /// Catalog file could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Any other unexpected failure caught at the outermost boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this outcome counts against the exception counter.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            AppError::RouteNotFound { .. } | AppError::Storage(_) | AppError::Internal(_)
        )
    }

    /// Whether the span for this outcome carries an ERROR status.
    /// Validation failures leave the span status untouched.
    pub fn marks_span_error(&self) -> bool {
        !matches!(self, AppError::Validation { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { field } => {
                pages::redirect_with_flash("/add_course", "missing", field).into_response()
            }
            AppError::NotFound { code } => {
                pages::redirect_with_flash("/catalog", "missing", &code).into_response()
            }
            AppError::RouteNotFound { .. } => (
                StatusCode::NOT_FOUND,
                pages::error_page(
                    "404 - Page Not Found",
                    "Oops! The page you are looking for doesn't exist.",
                    "Sorry, we couldn't find what you're looking for.",
                ),
            )
                .into_response(),
            AppError::Storage(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                pages::error_page(
                    "500 - Server Error",
                    "Oops! Something went wrong.",
                    "Please try refreshing the page or come back later.",
                ),
            )
                .into_response(),
        }
    }
}
