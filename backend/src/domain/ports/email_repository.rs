//! Port for signup record persistence.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::email::{EmailRecord, NewEmailRecord};

/// Errors raised by email repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailRepositoryError {
    /// Repository connection could not be established.
    #[error("email repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("email repository query failed: {message}")]
    Query { message: String },
}

impl EmailRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<EmailRepositoryError> for crate::domain::Error {
    fn from(err: EmailRepositoryError) -> Self {
        Self::persistence(err.to_string())
    }
}

/// Durable storage for captured signup records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailRepository: Send + Sync {
    /// Append one record. Duplicates are permitted.
    async fn insert(&self, record: &NewEmailRecord) -> Result<(), EmailRepositoryError>;

    /// All records, most recent insertion first.
    async fn list_recent_first(&self) -> Result<Vec<EmailRecord>, EmailRepositoryError>;
}

/// In-memory repository for tests and DB-less environments.
///
/// Assigns sequential ids starting at 1 and returns records in reverse
/// insertion order, matching the PostgreSQL adapter's `ORDER BY id DESC`.
#[derive(Debug, Default)]
pub struct InMemoryEmailRepository {
    rows: Mutex<Vec<EmailRecord>>,
}

impl InMemoryEmailRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmailRepository for InMemoryEmailRepository {
    async fn insert(&self, record: &NewEmailRecord) -> Result<(), EmailRepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| EmailRepositoryError::query("repository mutex poisoned"))?;
        let id = i32::try_from(rows.len() + 1)
            .map_err(|_| EmailRepositoryError::query("repository full"))?;
        rows.push(EmailRecord {
            id,
            timestamp: record.timestamp.clone(),
            ip: record.ip.clone(),
            email: record.email.clone(),
        });
        Ok(())
    }

    async fn list_recent_first(&self) -> Result<Vec<EmailRecord>, EmailRepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| EmailRepositoryError::query("repository mutex poisoned"))?;
        let mut out = rows.clone();
        out.reverse();
        Ok(out)
    }
}
