//! In-memory port implementations.
//!
//! Back the server when no database is configured (local development) and
//! give handler-level tests a deterministic store without I/O. Each store
//! mirrors the semantics the Diesel adapters promise: idempotent deletes,
//! unique user emails, and newest-first listings.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    InvitePersistenceError, InviteRepository, TokenPersistenceError, TripPersistenceError,
    TripRepository, UserPersistenceError, UserRepository, VerificationTokenRepository,
};
use crate::domain::{
    EmailAddress, InviteId, InviteStatus, MemberId, Trip, TripId, TripInvite, TripMember, User,
    UserId, UserSummary, VerificationToken,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Poisoning only means another test thread panicked mid-write; the data
    // is still coherent for these append/retain structures.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`UserRepository`].
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users).iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users).iter().find(|u| u.email == *email).cloned())
    }

    async fn mark_email_verified(
        &self,
        id: &UserId,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut users = lock(&self.users);
        match users.iter_mut().find(|u| u.id == *id) {
            Some(user) => {
                user.email_verified_at = Some(verified_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_summaries(
        &self,
        query: &str,
        exclude: &UserId,
        limit: i64,
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let needle = query.to_lowercase();
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(lock(&self.users)
            .iter()
            .filter(|u| u.id != *exclude)
            .filter(|u| {
                u.name.as_ref().to_lowercase().contains(&needle)
                    || u.email.as_ref().contains(&needle)
            })
            .take(limit)
            .map(User::summary)
            .collect())
    }
}

/// In-memory [`TripRepository`].
#[derive(Debug, Default)]
pub struct InMemoryTripRepository {
    trips: Mutex<Vec<Trip>>,
    members: Mutex<Vec<TripMember>>,
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn create(&self, trip: &Trip) -> Result<(), TripPersistenceError> {
        lock(&self.trips).push(trip.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError> {
        Ok(lock(&self.trips).iter().find(|t| t.id == *id).cloned())
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Trip>, TripPersistenceError> {
        let member_of: Vec<TripId> = lock(&self.members)
            .iter()
            .filter(|m| m.user_id == *user)
            .map(|m| m.trip_id)
            .collect();
        let mut trips: Vec<Trip> = lock(&self.trips)
            .iter()
            .filter(|t| t.creator_id == *user || member_of.contains(&t.id))
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn add_member(&self, member: &TripMember) -> Result<(), TripPersistenceError> {
        lock(&self.members).push(member.clone());
        Ok(())
    }

    async fn find_member(
        &self,
        trip: &TripId,
        member: &MemberId,
    ) -> Result<Option<TripMember>, TripPersistenceError> {
        Ok(lock(&self.members)
            .iter()
            .find(|m| m.trip_id == *trip && m.id == *member)
            .cloned())
    }

    async fn find_member_by_user(
        &self,
        trip: &TripId,
        user: &UserId,
    ) -> Result<Option<TripMember>, TripPersistenceError> {
        Ok(lock(&self.members)
            .iter()
            .find(|m| m.trip_id == *trip && m.user_id == *user)
            .cloned())
    }

    async fn list_members(&self, trip: &TripId) -> Result<Vec<TripMember>, TripPersistenceError> {
        Ok(lock(&self.members)
            .iter()
            .filter(|m| m.trip_id == *trip)
            .cloned()
            .collect())
    }

    async fn remove_member(&self, member: &MemberId) -> Result<bool, TripPersistenceError> {
        let mut members = lock(&self.members);
        let before = members.len();
        members.retain(|m| m.id != *member);
        Ok(members.len() < before)
    }
}

/// In-memory [`InviteRepository`].
#[derive(Debug, Default)]
pub struct InMemoryInviteRepository {
    invites: Mutex<Vec<TripInvite>>,
}

#[async_trait]
impl InviteRepository for InMemoryInviteRepository {
    async fn create(&self, invite: &TripInvite) -> Result<(), InvitePersistenceError> {
        lock(&self.invites).push(invite.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &InviteId,
    ) -> Result<Option<TripInvite>, InvitePersistenceError> {
        Ok(lock(&self.invites).iter().find(|i| i.id == *id).cloned())
    }

    async fn list_pending_for_receiver(
        &self,
        user: &UserId,
        email: &EmailAddress,
    ) -> Result<Vec<TripInvite>, InvitePersistenceError> {
        let mut invites: Vec<TripInvite> = lock(&self.invites)
            .iter()
            .filter(|i| i.status == InviteStatus::Pending && i.is_addressed_to(user, email))
            .cloned()
            .collect();
        invites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invites)
    }

    async fn list_pending_for_trip(
        &self,
        trip: &TripId,
    ) -> Result<Vec<TripInvite>, InvitePersistenceError> {
        Ok(lock(&self.invites)
            .iter()
            .filter(|i| i.trip_id == *trip && i.status == InviteStatus::Pending)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: &InviteId,
        status: InviteStatus,
    ) -> Result<bool, InvitePersistenceError> {
        let mut invites = lock(&self.invites);
        match invites.iter_mut().find(|i| i.id == *id) {
            Some(invite) => {
                invite.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &InviteId) -> Result<bool, InvitePersistenceError> {
        let mut invites = lock(&self.invites);
        let before = invites.len();
        invites.retain(|i| i.id != *id);
        Ok(invites.len() < before)
    }
}

/// In-memory [`VerificationTokenRepository`].
#[derive(Debug, Default)]
pub struct InMemoryVerificationTokenRepository {
    tokens: Mutex<Vec<VerificationToken>>,
}

#[async_trait]
impl VerificationTokenRepository for InMemoryVerificationTokenRepository {
    async fn insert(&self, token: &VerificationToken) -> Result<(), TokenPersistenceError> {
        lock(&self.tokens).push(token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<VerificationToken>, TokenPersistenceError> {
        Ok(lock(&self.tokens).iter().find(|t| t.token == token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<bool, TokenPersistenceError> {
        let mut tokens = lock(&self.tokens);
        let before = tokens.len();
        tokens.retain(|t| t.token != token);
        Ok(tokens.len() < before)
    }
}
