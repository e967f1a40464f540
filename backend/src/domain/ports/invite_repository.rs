//! Port abstraction for invitation persistence adapters.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{EmailAddress, Error, InviteId, InviteStatus, TripId, TripInvite, UserId};

/// Persistence errors raised by invite repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitePersistenceError {
    /// Repository connection could not be established.
    #[error("invite repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("invite repository query failed: {message}")]
    Query { message: String },
}

impl InvitePersistenceError {
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

impl From<InvitePersistenceError> for Error {
    fn from(err: InvitePersistenceError) -> Self {
        error!(error = %err, "invite store failure");
        Error::internal(err.to_string())
    }
}

/// Store of trip invitations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Insert a new invitation record.
    async fn create(&self, invite: &TripInvite) -> Result<(), InvitePersistenceError>;

    /// Fetch an invitation by identifier.
    async fn find_by_id(&self, id: &InviteId) -> Result<Option<TripInvite>, InvitePersistenceError>;

    /// Pending invitations addressed to the identity by id or email, newest
    /// first.
    async fn list_pending_for_receiver(
        &self,
        user: &UserId,
        email: &EmailAddress,
    ) -> Result<Vec<TripInvite>, InvitePersistenceError>;

    /// All pending invitations under a trip.
    async fn list_pending_for_trip(
        &self,
        trip: &TripId,
    ) -> Result<Vec<TripInvite>, InvitePersistenceError>;

    /// Transition an invitation's status. Returns whether a row was updated.
    async fn set_status(
        &self,
        id: &InviteId,
        status: InviteStatus,
    ) -> Result<bool, InvitePersistenceError>;

    /// Hard-delete an invitation. Deleting an absent row is a no-op returning
    /// `false`, so racing deletions never crash.
    async fn delete(&self, id: &InviteId) -> Result<bool, InvitePersistenceError>;
}
