//! PostgreSQL-backed `VerificationTokenRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TokenPersistenceError, VerificationTokenRepository};
use crate::domain::{EmailAddress, VerificationToken};

use super::models::{NewVerificationTokenRow, VerificationTokenRow};
use super::pool::{DbPool, PoolError};
use super::schema::verification_tokens;

/// Diesel-backed implementation of the `VerificationTokenRepository` port.
#[derive(Clone)]
pub struct DieselVerificationTokenRepository {
    pool: DbPool,
}

impl DieselVerificationTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TokenPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TokenPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TokenPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            TokenPersistenceError::connection(info.message().to_owned())
        }
        other => TokenPersistenceError::query(other.to_string()),
    }
}

fn row_to_token(row: VerificationTokenRow) -> Result<VerificationToken, TokenPersistenceError> {
    let identifier = EmailAddress::new(row.identifier)
        .map_err(|err| TokenPersistenceError::query(format!("corrupt token identifier: {err}")))?;
    Ok(VerificationToken {
        token: row.token,
        identifier,
        expires_at: row.expires_at,
    })
}

#[async_trait]
impl VerificationTokenRepository for DieselVerificationTokenRepository {
    async fn insert(&self, token: &VerificationToken) -> Result<(), TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewVerificationTokenRow {
            token: &token.token,
            identifier: token.identifier.as_ref(),
            expires_at: token.expires_at,
        };
        diesel::insert_into(verification_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, token: &str) -> Result<Option<VerificationToken>, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<VerificationTokenRow> = verification_tokens::table
            .filter(verification_tokens::token.eq(token))
            .select(VerificationTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_token).transpose()
    }

    async fn delete(&self, token: &str) -> Result<bool, TokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            verification_tokens::table.filter(verification_tokens::token.eq(token)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    fn corrupt_identifier_is_a_query_error() {
        let row = VerificationTokenRow {
            token: "deadbeef".to_owned(),
            identifier: "not-an-email".to_owned(),
            expires_at: Utc::now(),
        };
        let err = row_to_token(row).expect_err("bad identifier");
        assert!(err.to_string().contains("corrupt token identifier"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(err, TokenPersistenceError::Connection { .. }));
    }
}
