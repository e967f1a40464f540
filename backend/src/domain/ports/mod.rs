//! Domain ports and supporting types for the hexagonal boundary.

mod invite_repository;
mod mailer;
mod memory;
mod password_hasher;
mod trip_repository;
mod user_repository;
mod verification_token_repository;

#[cfg(test)]
pub use invite_repository::MockInviteRepository;
pub use invite_repository::{InvitePersistenceError, InviteRepository};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{MailError, Mailer};
pub use memory::{
    InMemoryInviteRepository, InMemoryTripRepository, InMemoryUserRepository,
    InMemoryVerificationTokenRepository,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{TripPersistenceError, TripRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use verification_token_repository::MockVerificationTokenRepository;
pub use verification_token_repository::{TokenPersistenceError, VerificationTokenRepository};
