//! Port for best-effort operator notification on signup.

use async_trait::async_trait;

use crate::domain::email::NewEmailRecord;

/// Errors raised by notifier adapters. Callers swallow these; a failed
/// notification never affects the signup response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifierError {
    /// The notification could not be composed or sent.
    #[error("signup notification failed: {message}")]
    Send { message: String },
}

impl NotifierError {
    pub fn send(message: impl Into<String>) -> Self {
        Self::Send {
            message: message.into(),
        }
    }
}

/// Delivers a signup notice to the operator mailbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupNotifier: Send + Sync {
    async fn notify(&self, record: &NewEmailRecord) -> Result<(), NotifierError>;
}
