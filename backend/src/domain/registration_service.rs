//! Signup and email-verification workflow.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::{Mailer, PasswordHasher, UserRepository, VerificationTokenRepository};
use crate::domain::{EmailAddress, Error, User, UserId, UserName, VerificationToken};

/// Minimum accepted password length, counted in characters.
pub const PASSWORD_MIN: usize = 8;

/// How long a verification token stays actionable.
const TOKEN_TTL_HOURS: i64 = 24;

/// Signup request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Creates unverified accounts and flips them to verified when a token is
/// consumed.
pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn VerificationTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
}

impl RegistrationService {
    /// Create a new service over the given ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn VerificationTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            mailer,
            clock,
        }
    }

    /// Register a new, unverified account and dispatch the verification mail.
    ///
    /// Mail delivery is fire-and-forget: a failure is logged and the signup
    /// still succeeds.
    pub async fn signup(&self, request: SignupRequest) -> Result<(), Error> {
        let name = UserName::new(request.name).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
        })?;
        let email = EmailAddress::new(request.email).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "email" }))
        })?;
        if request.password.chars().count() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ))
            .with_details(json!({ "field": "password" })));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::invalid_request("email already registered")
                .with_details(json!({ "field": "email" })));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            name,
            email: email.clone(),
            password_hash,
            email_verified_at: None,
            created_at: now,
        };
        self.users.insert(&user).await?;

        let token = VerificationToken::issue(email.clone(), now + Duration::hours(TOKEN_TTL_HOURS));
        self.tokens.insert(&token).await?;

        if let Err(err) = self.mailer.send_verification(&email, &token.token).await {
            warn!(error = %err, email = %email, "verification mail failed; signup continues");
        }
        Ok(())
    }

    /// Consume a verification token, stamping the account as verified.
    ///
    /// An expired token is deleted rather than honored, so a token is
    /// actionable at most once.
    pub async fn verify(&self, raw_token: &str) -> Result<(), Error> {
        let token = raw_token.trim();
        if token.is_empty() {
            return Err(Error::invalid_request("verification token is required"));
        }

        let Some(record) = self.tokens.find(token).await? else {
            return Err(Error::invalid_request("invalid verification token"));
        };

        let now = self.clock.utc();
        if record.is_expired(now) {
            self.tokens.delete(token).await?;
            return Err(Error::invalid_request("verification token expired"));
        }

        let Some(user) = self.users.find_by_email(&record.identifier).await? else {
            return Err(Error::not_found("no account matches this verification token"));
        };

        self.users.mark_email_verified(&user.id, now).await?;
        self.tokens.delete(token).await?;
        Ok(())
    }
}
