//! Credential login against stored password hashes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::{EmailAddress, Error, User};

/// Single message for every credential failure so callers cannot tell a
/// wrong password from an unknown email.
const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Resolves login credentials to a stored user.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Create a new service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Authenticate the credentials, returning the matching user.
    pub async fn login(&self, request: LoginRequest) -> Result<User, Error> {
        if request.email.trim().is_empty() {
            return Err(Error::invalid_request("email must not be empty")
                .with_details(json!({ "field": "email" })));
        }
        if request.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" })));
        }

        let Ok(email) = EmailAddress::new(request.email) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self.hasher.verify(&request.password, &user.password_hash)? {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{InMemoryUserRepository, MockPasswordHasher, UserRepository};
    use crate::domain::{UserId, UserName};
    use chrono::Utc;
    use rstest::rstest;

    async fn service_with_user(email: &str) -> AuthService {
        let users = Arc::new(InMemoryUserRepository::default());
        users
            .insert(&User {
                id: UserId::random(),
                name: UserName::new("Ada").expect("name"),
                email: EmailAddress::new(email).expect("email"),
                password_hash: "stored-hash".to_owned(),
                email_verified_at: Some(Utc::now()),
                created_at: Utc::now(),
            })
            .await
            .expect("insert user");

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(password == "correct horse" && hash == "stored-hash"));
        AuthService::new(users, Arc::new(hasher))
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn valid_credentials_return_the_user() {
        let service = service_with_user("ada@example.com").await;
        let user = service
            .login(request("ada@example.com", "correct horse"))
            .await
            .expect("login");
        assert_eq!(user.email.as_ref(), "ada@example.com");
    }

    #[rstest]
    #[case("ada@example.com", "wrong password")]
    #[case("other@example.com", "correct horse")]
    #[case("not-an-email", "correct horse")]
    #[tokio::test]
    async fn wrong_credentials_are_indistinguishable(
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let service = service_with_user("ada@example.com").await;
        let err = service
            .login(request(email, password))
            .await
            .expect_err("login must fail");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }

    #[rstest]
    #[case("   ", "correct horse")]
    #[case("ada@example.com", "")]
    #[tokio::test]
    async fn blank_fields_are_validation_errors(#[case] email: &str, #[case] password: &str) {
        let service = service_with_user("ada@example.com").await;
        let err = service
            .login(request(email, password))
            .await
            .expect_err("login must fail");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
