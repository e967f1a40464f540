//! Email verification tokens issued at signup.

use chrono::{DateTime, Utc};

use crate::domain::EmailAddress;

/// Number of random bytes behind a verification token (hex-encoded on the wire).
pub const TOKEN_BYTES: usize = 32;

/// A single-use token proving control of an email address.
///
/// Tokens are consumed (deleted) on successful verification; an expired token
/// is deleted rather than honored, so at most one token is ever actionable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub token: String,
    pub identifier: EmailAddress,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Mint a fresh token for the given email address.
    pub fn issue(identifier: EmailAddress, expires_at: DateTime<Utc>) -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        Self {
            token: hex::encode(bytes),
            identifier,
            expires_at,
        }
    }

    /// Whether the token has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
