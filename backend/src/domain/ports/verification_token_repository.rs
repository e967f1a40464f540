//! Port abstraction for verification-token persistence adapters.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{Error, VerificationToken};

/// Persistence errors raised by verification-token repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenPersistenceError {
    /// Repository connection could not be established.
    #[error("token repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("token repository query failed: {message}")]
    Query { message: String },
}

impl TokenPersistenceError {
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

impl From<TokenPersistenceError> for Error {
    fn from(err: TokenPersistenceError) -> Self {
        error!(error = %err, "verification token store failure");
        Error::internal(err.to_string())
    }
}

/// Store of single-use email verification tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    /// Insert a freshly issued token.
    async fn insert(&self, token: &VerificationToken) -> Result<(), TokenPersistenceError>;

    /// Look up a token by its wire value.
    async fn find(&self, token: &str) -> Result<Option<VerificationToken>, TokenPersistenceError>;

    /// Delete a token. Returns whether a row was removed.
    async fn delete(&self, token: &str) -> Result<bool, TokenPersistenceError>;
}
