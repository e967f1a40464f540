//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::json;

use crate::domain::EmailAddress;
use crate::domain::ports::{MailError, Mailer};
use crate::inbound::http::api_services;
use crate::inbound::http::state::{HttpState, StatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Captured outbound mail, letting tests read verification tokens back.
#[derive(Clone, Default)]
pub struct TestMailbox {
    verification_tokens: Arc<Mutex<Vec<String>>>,
}

impl TestMailbox {
    /// Tokens sent so far, oldest first.
    pub fn verification_tokens(&self) -> Vec<String> {
        self.verification_tokens
            .lock()
            .expect("mailbox lock")
            .clone()
    }
}

struct RecordingMailer {
    mailbox: TestMailbox,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, _to: &EmailAddress, token: &str) -> Result<(), MailError> {
        self.mailbox
            .verification_tokens
            .lock()
            .expect("mailbox lock")
            .push(token.to_owned());
        Ok(())
    }

    async fn send_invitation_notice(
        &self,
        _to: &EmailAddress,
        _trip_name: &str,
        _sender_name: &str,
    ) -> Result<(), MailError> {
        Ok(())
    }
}

/// In-memory HTTP state plus a mailbox capturing outbound tokens.
pub fn test_state() -> (HttpState, TestMailbox) {
    let mailbox = TestMailbox::default();
    let mut ports = StatePorts::in_memory();
    ports.mailer = Arc::new(RecordingMailer {
        mailbox: mailbox.clone(),
    });
    (HttpState::new(ports), mailbox)
}

/// Full API app over the given state, with session middleware installed.
pub fn test_app_with(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api")
            .wrap(test_session_middleware())
            .configure(api_services),
    )
}

/// Full API app over fresh in-memory state.
pub fn test_app() -> (
    App<
        impl actix_web::dev::ServiceFactory<
                actix_web::dev::ServiceRequest,
                Config = (),
                Response = ServiceResponse,
                Error = actix_web::Error,
                InitError = (),
            >,
    >,
    TestMailbox,
) {
    let (state, mailbox) = test_state();
    (test_app_with(state), mailbox)
}

/// Run a signup request and return the raw response.
pub async fn signup<S, B>(app: &S, name: &str, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "name": name, "email": email, "password": password }))
            .to_request(),
    )
    .await
}

/// Log in and return the session cookie.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login must succeed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Create an account and immediately log into it.
pub async fn signup_and_login<S, B>(app: &S, name: &str, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = signup(app, name, email, "correct horse").await;
    assert!(res.status().is_success(), "signup must succeed");
    login(app, email, "correct horse").await
}
