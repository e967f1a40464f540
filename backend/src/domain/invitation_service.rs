//! The invitation lifecycle: listing, creation, response, and deletion.
//!
//! Every operation re-reads current state before mutating; nothing is cached
//! between requests. Authorization failures that would reveal a trip's
//! existence to outsiders are reported as `NotFound` rather than `Forbidden`.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{InviteRepository, Mailer, TripRepository, UserRepository};
use crate::domain::trip_service::TRIP_NOT_FOUND;
use crate::domain::{
    EmailAddress, Error, InviteId, InviteStatus, InviteView, MemberId, Trip, TripId, TripInvite,
    TripMember, TripSummary, User, UserId,
};

/// Message used whenever an invitation is absent or masked.
const INVITE_NOT_FOUND: &str = "invitation not found";

/// Receiver's answer to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteResponse {
    Accept,
    Decline,
}

/// Orchestrates invite state and keeps membership consistent with it.
pub struct InvitationService {
    users: Arc<dyn UserRepository>,
    trips: Arc<dyn TripRepository>,
    invites: Arc<dyn InviteRepository>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl InvitationService {
    /// Create a new service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        trips: Arc<dyn TripRepository>,
        invites: Arc<dyn InviteRepository>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            trips,
            invites,
            mailer,
            clock,
        }
    }

    /// Pending invitations addressed to the identity, newest first.
    ///
    /// Invites whose trip or sender no longer resolves are orphaned: they are
    /// skipped and logged, never returned partially.
    pub async fn list_for(&self, identity: &UserId) -> Result<Vec<InviteView>, Error> {
        let user = self.require_identity(identity).await?;
        let invites = self
            .invites
            .list_pending_for_receiver(identity, &user.email)
            .await?;

        let mut views = Vec::with_capacity(invites.len());
        for invite in invites {
            let Some(trip) = self.trips.find_by_id(&invite.trip_id).await? else {
                warn!(invite = %invite.id, "skipping orphaned invite: trip missing");
                continue;
            };
            let Some(sender) = self.users.find_by_id(&invite.sender_id).await? else {
                warn!(invite = %invite.id, "skipping orphaned invite: sender missing");
                continue;
            };
            let Some(creator) = self.users.find_by_id(&trip.creator_id).await? else {
                warn!(invite = %invite.id, "skipping orphaned invite: trip creator missing");
                continue;
            };
            views.push(InviteView {
                id: invite.id,
                status: invite.status,
                created_at: invite.created_at,
                trip: TripSummary {
                    id: trip.id,
                    name: trip.name,
                    description: trip.description,
                    start_date: trip.start_date,
                    end_date: trip.end_date,
                    creator: creator.summary(),
                },
                sender: sender.summary(),
            });
        }
        Ok(views)
    }

    /// Invite `receiver_email` to a trip the sender creates for or belongs to.
    ///
    /// A receiver who is already a member, or who already has a pending
    /// invite for this trip, is rejected with `Conflict`. The notification
    /// mail is fire-and-forget.
    pub async fn create(
        &self,
        identity: &UserId,
        trip_id: &TripId,
        receiver_email: &str,
    ) -> Result<TripInvite, Error> {
        let sender = self.require_identity(identity).await?;
        let trip = self.accessible_trip(identity, trip_id).await?;

        let email = EmailAddress::new(receiver_email).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": "email" }))
        })?;
        if email == sender.email {
            return Err(Error::invalid_request("you cannot invite yourself"));
        }

        let receiver = self.users.find_by_email(&email).await?;
        if let Some(receiver) = &receiver {
            let already_member = trip.is_creator(&receiver.id)
                || self
                    .trips
                    .find_member_by_user(trip_id, &receiver.id)
                    .await?
                    .is_some();
            if already_member {
                return Err(Error::conflict("user is already a member of this trip"));
            }
        }

        let pending = self.invites.list_pending_for_trip(trip_id).await?;
        let duplicate = pending.iter().any(|invite| {
            invite.receiver_email == email
                || receiver
                    .as_ref()
                    .is_some_and(|r| invite.receiver_id == Some(r.id))
        });
        if duplicate {
            return Err(Error::conflict(
                "an invitation for this user is already pending",
            ));
        }

        let invite = TripInvite {
            id: InviteId::random(),
            trip_id: trip.id,
            sender_id: *identity,
            receiver_id: receiver.map(|r| r.id),
            receiver_email: email.clone(),
            status: InviteStatus::Pending,
            created_at: self.clock.utc(),
        };
        self.invites.create(&invite).await?;

        if let Err(err) = self
            .mailer
            .send_invitation_notice(&email, &trip.name, sender.name.as_ref())
            .await
        {
            warn!(error = %err, invite = %invite.id, "invitation mail failed; invite stands");
        }
        Ok(invite)
    }

    /// Accept or decline a pending invitation addressed to the identity.
    ///
    /// Accepting creates the membership row (unless one already exists) and
    /// marks the invite `ACCEPTED`; declining only marks it `DECLINED`.
    pub async fn respond(
        &self,
        identity: &UserId,
        invite_id: &InviteId,
        response: InviteResponse,
    ) -> Result<(), Error> {
        let user = self.require_identity(identity).await?;
        let Some(invite) = self.invites.find_by_id(invite_id).await? else {
            return Err(Error::not_found(INVITE_NOT_FOUND));
        };
        if invite.status != InviteStatus::Pending || !invite.is_addressed_to(identity, &user.email)
        {
            // An answered or foreign invite reads as absent to this caller.
            return Err(Error::not_found(INVITE_NOT_FOUND));
        }

        let status = match response {
            InviteResponse::Accept => {
                let Some(trip) = self.trips.find_by_id(&invite.trip_id).await? else {
                    return Err(Error::not_found(TRIP_NOT_FOUND));
                };
                let already_member = trip.is_creator(identity)
                    || self
                        .trips
                        .find_member_by_user(&trip.id, identity)
                        .await?
                        .is_some();
                if !already_member {
                    self.trips
                        .add_member(&TripMember {
                            id: MemberId::random(),
                            trip_id: trip.id,
                            user_id: *identity,
                            created_at: self.clock.utc(),
                        })
                        .await?;
                }
                InviteStatus::Accepted
            }
            InviteResponse::Decline => InviteStatus::Declined,
        };

        if !self.invites.set_status(invite_id, status).await? {
            return Err(Error::not_found(INVITE_NOT_FOUND));
        }
        Ok(())
    }

    /// Delete an invitation under a trip.
    ///
    /// Preconditions, in order: the identity can see the trip (else masked
    /// `NotFound`), the invite exists under that trip (else `NotFound`), and
    /// the identity is the invite's sender or the trip's creator (else
    /// `Forbidden`).
    pub async fn delete(
        &self,
        identity: &UserId,
        trip_id: &TripId,
        invite_id: &InviteId,
    ) -> Result<(), Error> {
        let trip = self.accessible_trip(identity, trip_id).await?;

        let Some(invite) = self.invites.find_by_id(invite_id).await? else {
            return Err(Error::not_found(INVITE_NOT_FOUND));
        };
        if invite.trip_id != *trip_id {
            return Err(Error::not_found(INVITE_NOT_FOUND));
        }

        if invite.sender_id != *identity && !trip.is_creator(identity) {
            return Err(Error::forbidden(
                "only the sender or the trip creator can delete an invitation",
            ));
        }

        // A concurrent deletion may win the race; the store reports it as a
        // no-op and this caller sees the invite as already gone.
        if !self.invites.delete(invite_id).await? {
            return Err(Error::not_found(INVITE_NOT_FOUND));
        }
        Ok(())
    }

    async fn require_identity(&self, identity: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(identity)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    async fn accessible_trip(&self, identity: &UserId, trip_id: &TripId) -> Result<Trip, Error> {
        let Some(trip) = self.trips.find_by_id(trip_id).await? else {
            return Err(Error::not_found(TRIP_NOT_FOUND));
        };
        if trip.is_creator(identity)
            || self
                .trips
                .find_member_by_user(trip_id, identity)
                .await?
                .is_some()
        {
            Ok(trip)
        } else {
            // Deliberately indistinguishable from a missing trip.
            Err(Error::not_found(TRIP_NOT_FOUND))
        }
    }
}
