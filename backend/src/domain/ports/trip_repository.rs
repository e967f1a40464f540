//! Port abstraction for trip and membership persistence adapters.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{Error, MemberId, Trip, TripId, TripMember, UserId};

/// Persistence errors raised by trip repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripPersistenceError {
    /// Repository connection could not be established.
    #[error("trip repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("trip repository query failed: {message}")]
    Query { message: String },
}

impl TripPersistenceError {
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

impl From<TripPersistenceError> for Error {
    fn from(err: TripPersistenceError) -> Self {
        error!(error = %err, "trip store failure");
        Error::internal(err.to_string())
    }
}

/// Store of trips and their membership rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a new trip record.
    async fn create(&self, trip: &Trip) -> Result<(), TripPersistenceError>;

    /// Fetch a trip by identifier.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError>;

    /// Trips the user created or belongs to, newest first.
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Trip>, TripPersistenceError>;

    /// Insert a membership row.
    async fn add_member(&self, member: &TripMember) -> Result<(), TripPersistenceError>;

    /// Fetch a membership row by its own id, scoped to the trip.
    async fn find_member(
        &self,
        trip: &TripId,
        member: &MemberId,
    ) -> Result<Option<TripMember>, TripPersistenceError>;

    /// Fetch a membership row for a specific user under a trip.
    async fn find_member_by_user(
        &self,
        trip: &TripId,
        user: &UserId,
    ) -> Result<Option<TripMember>, TripPersistenceError>;

    /// All membership rows of the trip.
    async fn list_members(&self, trip: &TripId) -> Result<Vec<TripMember>, TripPersistenceError>;

    /// Delete a membership row. Deleting an absent row is a no-op returning
    /// `false`, so racing removals never crash.
    async fn remove_member(&self, member: &MemberId) -> Result<bool, TripPersistenceError>;
}
