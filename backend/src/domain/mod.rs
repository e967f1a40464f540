//! Domain primitives, aggregates, and the workflow services built on them.
//!
//! Types here are transport agnostic. Inbound adapters map [`Error`] to
//! protocol envelopes; outbound adapters implement the traits in [`ports`].

pub mod auth_service;
pub mod error;
pub mod invite;
pub mod invitation_service;
pub mod membership_service;
pub mod ports;
pub mod registration_service;
pub mod search_service;
pub mod trip;
pub mod trip_service;
pub mod user;
pub mod verification;

pub use self::auth_service::{AuthService, LoginRequest};
pub use self::error::{Error, ErrorCode};
pub use self::invitation_service::{InvitationService, InviteResponse};
pub use self::invite::{InviteId, InviteStatus, InviteView, TripInvite, TripSummary};
pub use self::membership_service::MembershipService;
pub use self::registration_service::{RegistrationService, SignupRequest, PASSWORD_MIN};
pub use self::search_service::{QUERY_MIN, RESULT_CAP, UserSearchService};
pub use self::trip::{MemberId, Trip, TripId, TripMember};
pub use self::trip_service::{CreateTripRequest, TripService};
pub use self::user::{EmailAddress, User, UserId, UserName, UserSummary, UserValidationError};
pub use self::verification::VerificationToken;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
