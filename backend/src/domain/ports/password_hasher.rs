//! Collaborator port for password hashing and verification.

use tracing::error;

use crate::domain::Error;

/// Failures inside the hashing collaborator. Never caused by a wrong
/// password — mismatches are reported through `Ok(false)` on verify.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    /// Create a new hashing error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<PasswordHashError> for Error {
    fn from(err: PasswordHashError) -> Self {
        error!(error = %err, "password hasher failure");
        Error::internal(err.to_string())
    }
}

/// Hashes plaintext passwords and checks candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash of the plaintext password.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a candidate password against a stored hash.
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool, PasswordHashError>;
}
