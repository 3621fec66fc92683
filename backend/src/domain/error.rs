//! Domain-level error type.
//!
//! Transport agnostic: the HTTP adapter maps these to status codes and
//! plain-text bodies. Every failure here is terminal for the request that
//! raised it; the system performs no retries.

use thiserror::Error;

/// Stable machine-readable category describing the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The requested output format token is not supported.
    UnsupportedFormat,
    /// The uploaded bytes could not be decoded as an image.
    DecodeFailure,
    /// The client exhausted its daily conversion quota.
    DailyLimitExceeded,
    /// The admin secret is missing or wrong.
    Unauthorized,
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Persistent storage is unreachable or an insert/query failed.
    PersistenceFailure,
    /// An unexpected failure inside the domain.
    Internal,
}

/// Domain error carried by every fallible operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Rejection for an unrecognised format token, echoing it verbatim.
    pub fn unsupported_format(token: impl AsRef<str>) -> Self {
        Self::new(
            ErrorCode::UnsupportedFormat,
            format!("Unsupported format: {}", token.as_ref()),
        )
    }

    /// The upload could not be decoded as an image.
    pub fn decode_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecodeFailure, message)
    }

    /// The daily quota is exhausted.
    #[must_use]
    pub fn daily_limit_exceeded() -> Self {
        Self::new(
            ErrorCode::DailyLimitExceeded,
            "Daily limit reached. Try again tomorrow.",
        )
    }

    /// Missing or wrong admin secret.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "Unauthorized")
    }

    /// Malformed or invalid request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Storage failure. The HTTP adapter redacts the message.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PersistenceFailure, message)
    }

    /// Unexpected internal failure. The HTTP adapter redacts the message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// The failure category.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
