//! User search API handler for invitation targeting.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, TripId, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/users/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    #[serde(rename = "tripId")]
    trip_id: Option<Uuid>,
}

/// Response envelope for a user search.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub users: Vec<UserSummary>,
}

/// Search invitable users by partial name or email match.
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(
        ("q" = Option<String>, Query, description = "Partial name or email, two characters minimum"),
        ("tripId" = Option<Uuid>, Query, description = "Exclude this trip's members and invitees")
    ),
    responses(
        (status = 200, description = "Matching users", body = SearchResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"]
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<SearchResponse>> {
    let identity = session.require_user_id()?;
    let SearchQuery { q, trip_id } = query.into_inner();
    let users = state
        .search
        .search(
            &identity,
            q.as_deref().unwrap_or_default(),
            trip_id.map(TripId::from_uuid),
        )
        .await?;
    Ok(web::Json(SearchResponse { users }))
}
