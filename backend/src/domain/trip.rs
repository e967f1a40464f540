//! Trip aggregate and membership records.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Stable trip identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    /// Generate a new random [`TripId`].
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

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a membership row, distinct from the member's user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    /// Generate a new random [`MemberId`].
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

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A planned trip.
///
/// ## Invariants
/// - `end_date` is never before `start_date`.
/// - The creator is implicitly a privileged member: not represented by a
///   membership row and never removable through the member-removal path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[schema(value_type = String, example = "7d9f4cc2-31f4-4f9b-b5c7-6f2f8e1d0a44")]
    pub id: TripId,
    #[schema(value_type = String)]
    pub creator_id: UserId,
    #[schema(example = "Lakes long weekend")]
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Whether the given user created this trip.
    pub fn is_creator(&self, user: &UserId) -> bool {
        self.creator_id == *user
    }
}

/// Membership of one user in one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripMember {
    #[schema(value_type = String)]
    pub id: MemberId,
    #[schema(value_type = String)]
    pub trip_id: TripId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(creator: UserId) -> Trip {
        Trip {
            id: TripId::random(),
            creator_id: creator,
            name: "Lakes".to_owned(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 7, 3).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 6).expect("date"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn is_creator_matches_creator_id_only() {
        let creator = UserId::random();
        let trip = trip(creator);
        assert!(trip.is_creator(&creator));
        assert!(!trip.is_creator(&UserId::random()));
    }

    #[test]
    fn trip_serialises_camel_case() {
        let value = serde_json::to_value(trip(UserId::random())).expect("serialise");
        assert!(value.get("creatorId").is_some());
        assert!(value.get("startDate").is_some());
        assert!(value.get("creator_id").is_none());
    }
}
