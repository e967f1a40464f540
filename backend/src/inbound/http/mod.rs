//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod invites;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;
pub mod users;

pub use error::ApiResult;

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple `{"message": "..."}` success payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "done")]
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message string.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Register every API endpoint on a scope or app.
///
/// Shared by the server bootstrap and the test harness so both always serve
/// the same surface.
pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup)
        .service(auth::verify_email)
        .service(auth::login)
        .service(auth::logout)
        .service(trips::create_trip)
        .service(trips::list_trips)
        .service(trips::get_trip)
        .service(trips::remove_member)
        .service(invites::list_invites)
        .service(invites::create_invite)
        .service(invites::accept_invite)
        .service(invites::decline_invite)
        .service(invites::delete_invite)
        .service(users::search_users);
}
