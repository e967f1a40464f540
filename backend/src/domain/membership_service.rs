//! Member removal, reserved to the trip creator.

use std::sync::Arc;

use crate::domain::ports::{TripRepository, UserRepository};
use crate::domain::trip_service::TRIP_NOT_FOUND;
use crate::domain::{Error, MemberId, TripId, UserId, UserSummary};

const MEMBER_NOT_FOUND: &str = "member not found";

/// Removes members on the creator's authority while protecting the creator's
/// own privileged position.
pub struct MembershipService {
    users: Arc<dyn UserRepository>,
    trips: Arc<dyn TripRepository>,
}

impl MembershipService {
    /// Create a new service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, trips: Arc<dyn TripRepository>) -> Self {
        Self { users, trips }
    }

    /// Remove a member from a trip, echoing the removed member's public
    /// identity so callers can update their state without a re-fetch.
    ///
    /// Only the creator may remove members; plain membership is insufficient
    /// and masked as `NotFound`. A creator targeting their own user is a
    /// validation error, not an authorization failure.
    pub async fn remove_member(
        &self,
        identity: &UserId,
        trip_id: &TripId,
        member_id: &MemberId,
    ) -> Result<UserSummary, Error> {
        let Some(trip) = self.trips.find_by_id(trip_id).await? else {
            return Err(Error::not_found(TRIP_NOT_FOUND));
        };
        if !trip.is_creator(identity) {
            return Err(Error::not_found(TRIP_NOT_FOUND));
        }

        let Some(member) = self.trips.find_member(trip_id, member_id).await? else {
            return Err(Error::not_found(MEMBER_NOT_FOUND));
        };
        if member.user_id == *identity {
            return Err(Error::invalid_request(
                "the trip creator cannot remove themselves",
            ));
        }

        let Some(user) = self.users.find_by_id(&member.user_id).await? else {
            return Err(Error::not_found(MEMBER_NOT_FOUND));
        };
        if !self.trips.remove_member(member_id).await? {
            return Err(Error::not_found(MEMBER_NOT_FOUND));
        }
        Ok(user.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{InMemoryTripRepository, InMemoryUserRepository, TripRepository, UserRepository};
    use crate::domain::{EmailAddress, Trip, TripMember, User, UserName};
    use chrono::{NaiveDate, Utc};

    struct Harness {
        users: Arc<InMemoryUserRepository>,
        trips: Arc<InMemoryTripRepository>,
        service: MembershipService,
    }

    fn harness() -> Harness {
        let users = Arc::new(InMemoryUserRepository::default());
        let trips = Arc::new(InMemoryTripRepository::default());
        let service = MembershipService::new(users.clone(), trips.clone());
        Harness {
            users,
            trips,
            service,
        }
    }

    async fn add_user(h: &Harness, email: &str) -> User {
        let user = User {
            id: UserId::random(),
            name: UserName::new("Somebody").expect("name"),
            email: EmailAddress::new(email).expect("email"),
            password_hash: "hash".to_owned(),
            email_verified_at: None,
            created_at: Utc::now(),
        };
        h.users.insert(&user).await.expect("insert user");
        user
    }

    async fn add_trip(h: &Harness, creator: &UserId) -> Trip {
        let trip = Trip {
            id: crate::domain::TripId::random(),
            creator_id: *creator,
            name: "Lakes".to_owned(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 7, 3).expect("date"),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 6).expect("date"),
            created_at: Utc::now(),
        };
        h.trips.create(&trip).await.expect("create trip");
        trip
    }

    async fn add_member(h: &Harness, trip: &TripId, user: &UserId) -> TripMember {
        let member = TripMember {
            id: MemberId::random(),
            trip_id: *trip,
            user_id: *user,
            created_at: Utc::now(),
        };
        h.trips.add_member(&member).await.expect("add member");
        member
    }

    #[tokio::test]
    async fn creator_removes_a_member_and_gets_their_identity_back() {
        let h = harness();
        let creator = add_user(&h, "ada@example.com").await;
        let target = add_user(&h, "grace@example.com").await;
        let trip = add_trip(&h, &creator.id).await;
        let member = add_member(&h, &trip.id, &target.id).await;

        let removed = h
            .service
            .remove_member(&creator.id, &trip.id, &member.id)
            .await
            .expect("remove");
        assert_eq!(removed.email, "grace@example.com");
        assert!(
            h.trips
                .find_member(&trip.id, &member.id)
                .await
                .expect("query")
                .is_none()
        );
    }

    #[tokio::test]
    async fn plain_members_cannot_remove_and_see_not_found() {
        let h = harness();
        let creator = add_user(&h, "ada@example.com").await;
        let member_user = add_user(&h, "grace@example.com").await;
        let victim = add_user(&h, "heidi@example.com").await;
        let trip = add_trip(&h, &creator.id).await;
        add_member(&h, &trip.id, &member_user.id).await;
        let victim_row = add_member(&h, &trip.id, &victim.id).await;

        let err = h
            .service
            .remove_member(&member_user.id, &trip.id, &victim_row.id)
            .await
            .expect_err("member removal");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn creators_cannot_remove_themselves_regardless_of_other_members() {
        let h = harness();
        let creator = add_user(&h, "ada@example.com").await;
        let other = add_user(&h, "grace@example.com").await;
        let trip = add_trip(&h, &creator.id).await;
        add_member(&h, &trip.id, &other.id).await;
        // A legacy row can exist for the creator; the path must still refuse.
        let own_row = add_member(&h, &trip.id, &creator.id).await;

        let err = h
            .service
            .remove_member(&creator.id, &trip.id, &own_row.id)
            .await
            .expect_err("self removal");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(
            h.trips
                .find_member(&trip.id, &own_row.id)
                .await
                .expect("query")
                .is_some()
        );
    }

    #[tokio::test]
    async fn removing_twice_reads_as_absent_the_second_time() {
        let h = harness();
        let creator = add_user(&h, "ada@example.com").await;
        let target = add_user(&h, "grace@example.com").await;
        let trip = add_trip(&h, &creator.id).await;
        let member = add_member(&h, &trip.id, &target.id).await;

        h.service
            .remove_member(&creator.id, &trip.id, &member.id)
            .await
            .expect("first removal");
        let err = h
            .service
            .remove_member(&creator.id, &trip.id, &member.id)
            .await
            .expect_err("second removal");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn missing_trip_is_not_found() {
        let h = harness();
        let creator = add_user(&h, "ada@example.com").await;
        let err = h
            .service
            .remove_member(&creator.id, &TripId::random(), &MemberId::random())
            .await
            .expect_err("missing trip");
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
