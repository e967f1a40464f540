//! Diesel/PostgreSQL outbound adapters for the domain repository ports.

mod diesel_invite_repository;
mod diesel_trip_repository;
mod diesel_user_repository;
mod diesel_verification_token_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_invite_repository::DieselInviteRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_verification_token_repository::DieselVerificationTokenRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
