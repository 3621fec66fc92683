//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting actix handlers
//! turn failures into plain-text responses with consistent status codes.
//! Storage and internal failures are redacted before leaving the process.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::UnsupportedFormat | ErrorCode::DecodeFailure | ErrorCode::InvalidRequest => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::DailyLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Unauthorized => StatusCode::FORBIDDEN,
        ErrorCode::PersistenceFailure | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(err: &Error) -> &str {
    match err.code() {
        ErrorCode::PersistenceFailure | ErrorCode::Internal => "Internal server error",
        _ => err.message(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(
            self.code(),
            ErrorCode::PersistenceFailure | ErrorCode::Internal
        ) {
            error!(error = %self, "request failed");
        }
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(public_message(self).to_owned())
    }
}
