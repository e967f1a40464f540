//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data` so they depend on
//! domain services only and stay testable without I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    InMemoryInviteRepository, InMemoryTripRepository, InMemoryUserRepository,
    InMemoryVerificationTokenRepository, InviteRepository, Mailer, PasswordHasher, TripRepository,
    UserRepository, VerificationTokenRepository,
};
use crate::domain::{
    AuthService, InvitationService, MembershipService, RegistrationService, TripService,
    UserSearchService,
};
use crate::outbound::email::TracingMailer;
use crate::outbound::security::Argon2PasswordHasher;

/// Parameter object bundling every port implementation the services need.
pub struct StatePorts {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub invites: Arc<dyn InviteRepository>,
    pub tokens: Arc<dyn VerificationTokenRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub mailer: Arc<dyn Mailer>,
    pub clock: Arc<dyn Clock>,
}

impl StatePorts {
    /// Ports backed by in-memory stores: local development and tests.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            trips: Arc::new(InMemoryTripRepository::default()),
            invites: Arc::new(InMemoryInviteRepository::default()),
            tokens: Arc::new(InMemoryVerificationTokenRepository::default()),
            hasher: Arc::new(Argon2PasswordHasher::default()),
            mailer: Arc::new(TracingMailer),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<RegistrationService>,
    pub auth: Arc<AuthService>,
    pub trips: Arc<TripService>,
    pub invitations: Arc<InvitationService>,
    pub membership: Arc<MembershipService>,
    pub search: Arc<UserSearchService>,
}

impl HttpState {
    /// Wire the domain services over one set of ports.
    pub fn new(ports: StatePorts) -> Self {
        let StatePorts {
            users,
            trips,
            invites,
            tokens,
            hasher,
            mailer,
            clock,
        } = ports;

        Self {
            registration: Arc::new(RegistrationService::new(
                users.clone(),
                tokens,
                hasher.clone(),
                mailer.clone(),
                clock.clone(),
            )),
            auth: Arc::new(AuthService::new(users.clone(), hasher)),
            trips: Arc::new(TripService::new(trips.clone(), clock.clone())),
            invitations: Arc::new(InvitationService::new(
                users.clone(),
                trips.clone(),
                invites.clone(),
                mailer,
                clock,
            )),
            membership: Arc::new(MembershipService::new(users.clone(), trips.clone())),
            search: Arc::new(UserSearchService::new(users, trips, invites)),
        }
    }
}
