//! Invitable-user search with in-process exclusion filtering.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ports::{InviteRepository, TripRepository, UserRepository};
use crate::domain::{Error, TripId, UserId, UserSummary};

/// Fewest characters (after trimming) a query must have to hit the store.
pub const QUERY_MIN: usize = 2;

/// Hard cap on candidates fetched from the store.
pub const RESULT_CAP: i64 = 10;

/// Finds users who could be invited to a trip.
pub struct UserSearchService {
    users: Arc<dyn UserRepository>,
    trips: Arc<dyn TripRepository>,
    invites: Arc<dyn InviteRepository>,
}

impl UserSearchService {
    /// Create a new service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        trips: Arc<dyn TripRepository>,
        invites: Arc<dyn InviteRepository>,
    ) -> Self {
        Self {
            users,
            trips,
            invites,
        }
    }

    /// Case-insensitive substring search over names and emails.
    ///
    /// Queries shorter than [`QUERY_MIN`] characters short-circuit to an
    /// empty result without touching the store. With a `trip` given, current
    /// members, pending invitees, and the trip creator are filtered out
    /// in-process after the capped base query, so a crowded trip can return
    /// fewer than [`RESULT_CAP`] rows even when more candidates exist
    /// server-side. The cap-before-filter order is intentional.
    pub async fn search(
        &self,
        identity: &UserId,
        raw_query: &str,
        trip: Option<TripId>,
    ) -> Result<Vec<UserSummary>, Error> {
        let query = raw_query.trim();
        if query.chars().count() < QUERY_MIN {
            return Ok(Vec::new());
        }

        let mut results = self
            .users
            .search_summaries(query, identity, RESULT_CAP)
            .await?;

        if let Some(trip_id) = trip {
            // Members and pending invites are independent reads; fetch them
            // concurrently, then filter in-process.
            let members = async { self.trips.list_members(&trip_id).await.map_err(Error::from) };
            let pending = async {
                self.invites
                    .list_pending_for_trip(&trip_id)
                    .await
                    .map_err(Error::from)
            };
            let trip_record =
                async { self.trips.find_by_id(&trip_id).await.map_err(Error::from) };
            let (members, pending, trip_record) = tokio::try_join!(members, pending, trip_record)?;

            let member_ids: HashSet<Uuid> =
                members.iter().map(|m| *m.user_id.as_uuid()).collect();
            let invited_ids: HashSet<Uuid> = pending
                .iter()
                .filter_map(|i| i.receiver_id.map(|id| *id.as_uuid()))
                .collect();
            let invited_emails: HashSet<&str> = pending
                .iter()
                .map(|i| i.receiver_email.as_ref())
                .collect();
            let creator_id = trip_record.map(|t| *t.creator_id.as_uuid());

            results.retain(|candidate| {
                !member_ids.contains(&candidate.id)
                    && !invited_ids.contains(&candidate.id)
                    && !invited_emails.contains(candidate.email.as_str())
                    && Some(candidate.id) != creator_id
            });
        }

        Ok(results)
    }
}
