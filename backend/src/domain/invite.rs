//! Trip invitation records and the views returned to receivers.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{EmailAddress, TripId, UserId, UserSummary};

/// Stable invitation identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteId(Uuid);

impl InviteId {
    /// Generate a new random [`InviteId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for InviteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
}

impl InviteStatus {
    /// Store representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
        }
    }

    /// Parse the store representation back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "ACCEPTED" => Some(Self::Accepted),
            "DECLINED" => Some(Self::Declined),
            _ => None,
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invitation from a trip insider to a prospective member.
///
/// The receiver is addressed by email; `receiver_id` is resolved at creation
/// time when the email already belongs to a registered user. An invite whose
/// receiver signs up later still reaches them through the email match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripInvite {
    pub id: InviteId,
    pub trip_id: TripId,
    pub sender_id: UserId,
    pub receiver_id: Option<UserId>,
    pub receiver_email: EmailAddress,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

impl TripInvite {
    /// Whether this invite is addressed to the given identity.
    pub fn is_addressed_to(&self, user: &UserId, email: &EmailAddress) -> bool {
        self.receiver_id.as_ref() == Some(user) || self.receiver_email == *email
    }
}

/// Trip details shown alongside a pending invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    #[schema(value_type = String)]
    pub id: TripId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub creator: UserSummary,
}

/// A pending invitation as listed for its receiver: never partial — the trip
/// and sender are always present, or the invite is dropped as orphaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteView {
    #[schema(value_type = String)]
    pub id: InviteId,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub trip: TripSummary,
    pub sender: UserSummary,
}
