//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint and the schemas their bodies
//! reference. Swagger UI serves the generated document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CreateTripRequest, Error, ErrorCode, InviteStatus, InviteView, LoginRequest, SignupRequest,
    Trip, TripSummary, UserSummary,
};
use crate::inbound::http::MessageResponse;
use crate::inbound::http::invites::{CreateInviteRequest, CreateInviteResponse, InviteSummary};
use crate::inbound::http::trips::RemoveMemberResponse;
use crate::inbound::http::users::SearchResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Trip planner backend API",
        description = "Signup, trips, memberships, and the invitation lifecycle."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::verify_email,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::remove_member,
        crate::inbound::http::invites::list_invites,
        crate::inbound::http::invites::create_invite,
        crate::inbound::http::invites::accept_invite,
        crate::inbound::http::invites::decline_invite,
        crate::inbound::http::invites::delete_invite,
        crate::inbound::http::users::search_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        MessageResponse,
        SignupRequest,
        LoginRequest,
        CreateTripRequest,
        Trip,
        UserSummary,
        TripSummary,
        InviteView,
        InviteStatus,
        CreateInviteRequest,
        InviteSummary,
        CreateInviteResponse,
        RemoveMemberResponse,
        SearchResponse,
    )),
    tags(
        (name = "auth", description = "Signup, verification, and sessions"),
        (name = "trips", description = "Trips and their members"),
        (name = "invites", description = "The invitation lifecycle"),
        (name = "users", description = "User search for invitation targeting"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
