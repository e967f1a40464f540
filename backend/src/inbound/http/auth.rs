//! Authentication API handlers: signup, verification, login, logout.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{Error, LoginRequest, SignupRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, MessageResponse};

/// Query string for `GET /api/auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    token: Option<String>,
}

/// Register a new account and dispatch the verification email.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    state.registration.signup(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(
        "account created; check your inbox to verify your email",
    )))
}

/// Consume an emailed verification token.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    params(("token" = Option<String>, Query, description = "Verification token from the email")),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Missing, invalid, or expired token", body = Error),
        (status = 404, description = "No matching account", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    security([])
)]
#[get("/auth/verify")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    query: web::Query<VerifyQuery>,
) -> ApiResult<HttpResponse> {
    let token = query.into_inner().token.unwrap_or_default();
    state.registration.verify(&token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("email verified")))
}

/// Authenticate credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = MessageResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.auth.login(payload.into_inner()).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("logged in")))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"]
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    session.clear();
    Ok(HttpResponse::Ok().json(MessageResponse::new("logged out")))
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{signup, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn signup_returns_created_and_login_works() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let res = signup(&app, "Ada Lovelace", "ada@example.com", "correct horse").await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let login = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": "correct horse" }))
                .to_request(),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        assert!(
            login
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[actix_web::test]
    async fn short_password_is_a_validation_error() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let res = signup(&app, "Ada Lovelace", "ada@example.com", "short").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("code"), Some(&json!("invalid_request")));
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        signup(&app, "Ada Lovelace", "ada@example.com", "correct horse").await;

        let login = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": "battery staple" }))
                .to_request(),
        )
        .await;
        assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn verify_consumes_the_token_exactly_once() {
        let (app, mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        signup(&app, "Ada Lovelace", "ada@example.com", "correct horse").await;
        let token = mailbox
            .verification_tokens()
            .pop()
            .expect("verification token recorded");

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/auth/verify?token={token}"))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/auth/verify?token={token}"))
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn verify_without_token_is_a_validation_error() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/auth/verify")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn logout_requires_a_session() {
        let (app, _mailbox) = test_app();
        let app = actix_test::init_service(app).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/logout")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
