//! Port for the flat-file mirror of the signup records.

use async_trait::async_trait;

use crate::domain::email::EmailRecord;

/// Errors raised by mirror adapters. Mirror rewrites are best effort; a
/// failure is logged by the caller and never surfaced to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    /// The mirror file could not be rendered or written.
    #[error("email mirror rewrite failed: {message}")]
    Write { message: String },
}

impl MirrorError {
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Redundant flat-file copy of the record set.
///
/// `rewrite` replaces the whole file with `records` in the order given
/// (callers pass most-recent-first); it never appends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailMirror: Send + Sync {
    async fn rewrite(&self, records: &[EmailRecord]) -> Result<(), MirrorError>;
}
