//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::error;

use crate::domain::{EmailAddress, Error, User, UserId, UserSummary};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },

    /// Insert collided with the unique email constraint.
    #[error("email already registered")]
    DuplicateEmail,
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<UserPersistenceError> for Error {
    fn from(err: UserPersistenceError) -> Self {
        match err {
            UserPersistenceError::DuplicateEmail => {
                Error::invalid_request("email already registered")
            }
            other => {
                error!(error = %other, "user store failure");
                Error::internal(other.to_string())
            }
        }
    }
}

/// Store of user records, keyed by id and unique email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by (normalised) email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Stamp the user's email as verified. Returns whether a row was updated.
    async fn mark_email_verified(
        &self,
        id: &UserId,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;

    /// Case-insensitive substring search over name and email, excluding the
    /// requesting user, capped at `limit` rows in store order.
    async fn search_summaries(
        &self,
        query: &str,
        exclude: &UserId,
        limit: i64,
    ) -> Result<Vec<UserSummary>, UserPersistenceError>;
}
