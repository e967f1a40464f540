//! Invitation API handlers: listing, creation, response, and deletion.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Error, InviteId, InviteResponse, InviteStatus, InviteView, TripId, TripInvite,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, MessageResponse};

/// Request body for `POST /api/trips/{tripId}/invite`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInviteRequest {
    #[schema(example = "grace@example.com")]
    pub email: String,
}

/// Wire shape of a freshly created invitation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteSummary {
    #[schema(value_type = String)]
    pub id: InviteId,
    #[schema(value_type = String)]
    pub trip_id: TripId,
    pub receiver_email: String,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

impl From<TripInvite> for InviteSummary {
    fn from(invite: TripInvite) -> Self {
        Self {
            id: invite.id,
            trip_id: invite.trip_id,
            receiver_email: invite.receiver_email.as_ref().to_owned(),
            status: invite.status,
            created_at: invite.created_at,
        }
    }
}

/// Response for a successful invite creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteResponse {
    pub message: String,
    pub invite: InviteSummary,
}

/// List pending invitations addressed to the current user, newest first.
#[utoipa::path(
    get,
    path = "/api/invites",
    responses(
        (status = 200, description = "Pending invitations", body = [InviteView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"]
)]
#[get("/invites")]
pub async fn list_invites(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<InviteView>>> {
    let identity = session.require_user_id()?;
    Ok(web::Json(state.invitations.list_for(&identity).await?))
}

/// Invite someone to a trip by email.
#[utoipa::path(
    post,
    path = "/api/trips/{tripId}/invite",
    params(("tripId" = Uuid, Path, description = "Trip identifier")),
    request_body = CreateInviteRequest,
    responses(
        (status = 201, description = "Invitation created", body = CreateInviteResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip missing or not visible", body = Error),
        (status = 409, description = "Already a member or already invited", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"]
)]
#[post("/trips/{trip_id}/invite")]
pub async fn create_invite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<CreateInviteRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_user_id()?;
    let trip_id = TripId::from_uuid(path.into_inner());
    let invite = state
        .invitations
        .create(&identity, &trip_id, &payload.email)
        .await?;
    Ok(HttpResponse::Created().json(CreateInviteResponse {
        message: "invitation sent".to_owned(),
        invite: invite.into(),
    }))
}

/// Accept a pending invitation, joining the trip.
#[utoipa::path(
    post,
    path = "/api/invites/{inviteId}/accept",
    params(("inviteId" = Uuid, Path, description = "Invitation identifier")),
    responses(
        (status = 200, description = "Invitation accepted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such pending invitation for this user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"]
)]
#[post("/invites/{invite_id}/accept")]
pub async fn accept_invite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    respond(state, session, path, InviteResponse::Accept).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("invitation accepted")))
}

/// Decline a pending invitation.
#[utoipa::path(
    post,
    path = "/api/invites/{inviteId}/decline",
    params(("inviteId" = Uuid, Path, description = "Invitation identifier")),
    responses(
        (status = 200, description = "Invitation declined", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such pending invitation for this user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"]
)]
#[post("/invites/{invite_id}/decline")]
pub async fn decline_invite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    respond(state, session, path, InviteResponse::Decline).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("invitation declined")))
}

async fn respond(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    response: InviteResponse,
) -> ApiResult<()> {
    let identity = session.require_user_id()?;
    let invite_id = InviteId::from_uuid(path.into_inner());
    state
        .invitations
        .respond(&identity, &invite_id, response)
        .await
}

/// Delete an invitation under a trip. Sender or trip creator only.
#[utoipa::path(
    delete,
    path = "/api/trips/{tripId}/invite/{inviteId}",
    params(
        ("tripId" = Uuid, Path, description = "Trip identifier"),
        ("inviteId" = Uuid, Path, description = "Invitation identifier")
    ),
    responses(
        (status = 200, description = "Invitation deleted", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Neither sender nor creator", body = Error),
        (status = 404, description = "Trip or invitation missing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"]
)]
#[delete("/trips/{trip_id}/invite/{invite_id}")]
pub async fn delete_invite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_user_id()?;
    let (trip_id, invite_id) = path.into_inner();
    state
        .invitations
        .delete(
            &identity,
            &TripId::from_uuid(trip_id),
            &InviteId::from_uuid(invite_id),
        )
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("invitation deleted")))
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{signup_and_login, test_app};
    use actix_http::Request;
    use actix_web::body::MessageBody;
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    async fn create_trip<S, B>(app: &S, cookie: &Cookie<'static>) -> String
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/trips")
                .cookie(cookie.clone())
                .set_json(json!({
                    "name": "Lakes long weekend",
                    "startDate": "2026-07-03",
                    "endDate": "2026-07-06"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        body.get("id")
            .and_then(Value::as_str)
            .expect("trip id")
            .to_owned()
    }

    async fn invite<S, B>(
        app: &S,
        cookie: &Cookie<'static>,
        trip_id: &str,
        email: &str,
    ) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/trips/{trip_id}/invite"))
                .cookie(cookie.clone())
                .set_json(json!({ "email": email }))
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn invites_require_a_session() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/invites")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn invite_create_list_accept_flow() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let ada = signup_and_login(&app, "Ada", "ada@example.com").await;
        let grace = signup_and_login(&app, "Grace", "grace@example.com").await;
        let trip_id = create_trip(&app, &ada).await;

        let created = invite(&app, &ada, &trip_id, "grace@example.com").await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(created).await;
        assert_eq!(
            created.pointer("/invite/status"),
            Some(&json!("PENDING"))
        );

        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/invites")
                .cookie(grace.clone())
                .to_request(),
        )
        .await;
        assert_eq!(listed.status(), StatusCode::OK);
        let listed: Value = actix_test::read_body_json(listed).await;
        let entries = listed.as_array().expect("array");
        assert_eq!(entries.len(), 1);
        let invite_id = entries[0]
            .get("id")
            .and_then(Value::as_str)
            .expect("invite id")
            .to_owned();
        assert_eq!(
            entries[0].pointer("/trip/creator/email"),
            Some(&json!("ada@example.com"))
        );

        let accepted = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/invites/{invite_id}/accept"))
                .cookie(grace.clone())
                .to_request(),
        )
        .await;
        assert_eq!(accepted.status(), StatusCode::OK);

        // Membership makes the trip visible to the receiver now.
        let seen = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/trips/{trip_id}"))
                .cookie(grace)
                .to_request(),
        )
        .await;
        assert_eq!(seen.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn duplicate_pending_invite_conflicts() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let ada = signup_and_login(&app, "Ada", "ada@example.com").await;
        let trip_id = create_trip(&app, &ada).await;

        let first = invite(&app, &ada, &trip_id, "grace@example.com").await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = invite(&app, &ada, &trip_id, "grace@example.com").await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn outsiders_deleting_get_not_found_members_get_forbidden() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let ada = signup_and_login(&app, "Ada", "ada@example.com").await;
        let eve = signup_and_login(&app, "Eve", "eve@example.com").await;
        let trip_id = create_trip(&app, &ada).await;

        let created = invite(&app, &ada, &trip_id, "grace@example.com").await;
        let created: Value = actix_test::read_body_json(created).await;
        let invite_id = created
            .pointer("/invite/id")
            .and_then(Value::as_str)
            .expect("invite id")
            .to_owned();

        // Eve is an outsider: the trip itself must read as absent.
        let as_outsider = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/trips/{trip_id}/invite/{invite_id}"))
                .cookie(eve.clone())
                .to_request(),
        )
        .await;
        assert_eq!(as_outsider.status(), StatusCode::NOT_FOUND);

        // Make Eve a member through her own invite; she still may not delete
        // an invitation she did not send.
        let eve_invite = invite(&app, &ada, &trip_id, "eve@example.com").await;
        let eve_invite: Value = actix_test::read_body_json(eve_invite).await;
        let eve_invite_id = eve_invite
            .pointer("/invite/id")
            .and_then(Value::as_str)
            .expect("invite id")
            .to_owned();
        let joined = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/invites/{eve_invite_id}/accept"))
                .cookie(eve.clone())
                .to_request(),
        )
        .await;
        assert_eq!(joined.status(), StatusCode::OK);

        let as_member = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/trips/{trip_id}/invite/{invite_id}"))
                .cookie(eve)
                .to_request(),
        )
        .await;
        assert_eq!(as_member.status(), StatusCode::FORBIDDEN);

        // The creator can, and a repeat reads as absent.
        let as_creator = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/trips/{trip_id}/invite/{invite_id}"))
                .cookie(ada.clone())
                .to_request(),
        )
        .await;
        assert_eq!(as_creator.status(), StatusCode::OK);
        let again = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/trips/{trip_id}/invite/{invite_id}"))
                .cookie(ada)
                .to_request(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }
}
