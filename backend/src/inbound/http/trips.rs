//! Trip API handlers: creation, listing, reads, and member removal.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CreateTripRequest, Error, MemberId, Trip, TripId, UserSummary};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Response for a successful member removal: the echoed identity lets the
/// caller update its view without a re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberResponse {
    pub message: String,
    pub removed_member: UserSummary,
}

/// Create a trip owned by the current session user.
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = Trip),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["trips"]
)]
#[post("/trips")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_user_id()?;
    let trip = state.trips.create(&identity, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/// List the trips the current user created or belongs to.
#[utoipa::path(
    get,
    path = "/api/trips",
    responses(
        (status = 200, description = "Trips", body = [Trip]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["trips"]
)]
#[get("/trips")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Trip>>> {
    let identity = session.require_user_id()?;
    Ok(web::Json(state.trips.list(&identity).await?))
}

/// Fetch a single trip the current user can see.
#[utoipa::path(
    get,
    path = "/api/trips/{tripId}",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip", body = Trip),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip missing or not visible", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["trips"]
)]
#[get("/trips/{trip_id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Trip>> {
    let identity = session.require_user_id()?;
    let trip_id = TripId::from_uuid(path.into_inner());
    Ok(web::Json(state.trips.get(&identity, &trip_id).await?))
}

/// Remove a member from a trip. Creator only.
#[utoipa::path(
    delete,
    path = "/api/trips/{tripId}/members/{memberId}",
    params(
        ("tripId" = Uuid, Path, description = "Trip identifier"),
        ("memberId" = Uuid, Path, description = "Membership row identifier")
    ),
    responses(
        (status = 200, description = "Member removed", body = RemoveMemberResponse),
        (status = 400, description = "Creator self-removal", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip or member missing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["trips"]
)]
#[delete("/trips/{trip_id}/members/{member_id}")]
pub async fn remove_member(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<web::Json<RemoveMemberResponse>> {
    let identity = session.require_user_id()?;
    let (trip_id, member_id) = path.into_inner();
    let removed = state
        .membership
        .remove_member(
            &identity,
            &TripId::from_uuid(trip_id),
            &MemberId::from_uuid(member_id),
        )
        .await?;
    Ok(web::Json(RemoveMemberResponse {
        message: "member removed".to_owned(),
        removed_member: removed,
    }))
}
