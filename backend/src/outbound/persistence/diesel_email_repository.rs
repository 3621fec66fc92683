//! PostgreSQL-backed `EmailRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{EmailRepository, EmailRepositoryError};
use crate::domain::{EmailRecord, NewEmailRecord};

use super::models::{EmailRow, NewEmailRow};
use super::pool::{DbPool, PoolError};
use super::schema::emails;

/// Diesel-backed implementation of the `EmailRepository` port.
#[derive(Clone)]
pub struct DieselEmailRepository {
    pool: DbPool,
}

impl DieselEmailRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EmailRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EmailRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> EmailRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            EmailRepositoryError::connection("database connection error")
        }
        _ => EmailRepositoryError::query("database error"),
    }
}

fn row_to_record(row: EmailRow) -> EmailRecord {
    EmailRecord {
        id: row.id,
        timestamp: row.timestamp,
        ip: row.ip,
        email: row.email,
    }
}

#[async_trait]
impl EmailRepository for DieselEmailRepository {
    async fn insert(&self, record: &NewEmailRecord) -> Result<(), EmailRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(emails::table)
            .values(NewEmailRow {
                timestamp: &record.timestamp,
                ip: &record.ip,
                email: &record.email,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_recent_first(&self) -> Result<Vec<EmailRecord>, EmailRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = emails::table
            .order(emails::id.desc())
            .select(EmailRow::as_select())
            .load::<EmailRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, EmailRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn generic_diesel_errors_map_to_query_failures() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(err, EmailRepositoryError::query("database error"));
    }
}
