//! Collaborator port for outgoing email.
//!
//! Delivery is fire-and-forget everywhere it is used: callers log failures
//! and carry on, so this error type intentionally has no conversion into the
//! domain [`Error`](crate::domain::Error).

use async_trait::async_trait;

use crate::domain::EmailAddress;

/// Failure to hand a message to the delivery backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mail delivery failed: {message}")]
pub struct MailError {
    message: String,
}

impl MailError {
    /// Create a new delivery error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sends the two notification mails the product needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver the signup verification link for `token`.
    async fn send_verification(&self, to: &EmailAddress, token: &str) -> Result<(), MailError>;

    /// Tell a receiver they have been invited to a trip.
    async fn send_invitation_notice(
        &self,
        to: &EmailAddress,
        trip_name: &str,
        sender_name: &str,
    ) -> Result<(), MailError>;
}
