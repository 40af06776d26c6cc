//! Password login: check credentials and issue a bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::debug;

use crate::domain::identity_store::IdentityStore;
use crate::domain::ports::{
    CredentialCodec, INVALID_CREDENTIALS_MESSAGE, LoginService, TokenService, TokenServiceError,
    UserRepository,
};
use crate::domain::{AccessToken, Email, Error, LoginCredentials};

/// [`LoginService`] backed by the identity store and a token service.
pub struct PasswordLoginService<U, C, T> {
    identities: IdentityStore<U, C>,
    tokens: Arc<T>,
    ttl: Duration,
}

impl<U, C, T> PasswordLoginService<U, C, T> {
    /// Create a login service issuing tokens valid for `ttl`.
    pub fn new(identities: IdentityStore<U, C>, tokens: Arc<T>, ttl: Duration) -> Self {
        Self {
            identities,
            tokens,
            ttl,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
}

fn map_token_error(error: TokenServiceError) -> Error {
    match error {
        TokenServiceError::InvalidToken => Error::internal("freshly issued token was rejected"),
        TokenServiceError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

#[async_trait]
impl<U, C, T> LoginService for PasswordLoginService<U, C, T>
where
    U: UserRepository,
    C: CredentialCodec + 'static,
    T: TokenService,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        // Stored keys are always email shaped, so anything else cannot match.
        let Ok(email) = Email::new(credentials.username()) else {
            debug!("login rejected: username is not an email");
            return Err(invalid_credentials());
        };
        let Some(user) = self.identities.find_by_key(&email).await? else {
            debug!("login rejected: unknown identity");
            return Err(invalid_credentials());
        };
        if !self
            .identities
            .verify_password(&user, credentials.password())
            .await?
        {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(invalid_credentials());
        }
        self.tokens
            .issue(user.id(), user.email(), self.ttl)
            .map_err(map_token_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCredentialCodec, MockTokenService, MockUserRepository};
    use crate::domain::{PasswordHash, User, UserId};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn user(is_active: bool) -> User {
        User::new(
            UserId::new(1),
            Email::new("ada@example.com").expect("valid email"),
            PasswordHash::new("hashed:password1"),
            is_active,
            false,
        )
    }

    fn make_service(is_active: bool) -> PasswordLoginService<
        MockUserRepository,
        MockCredentialCodec,
        MockTokenService,
    > {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |email| {
            Ok((email.as_ref() == "ada@example.com").then(|| user(is_active)))
        });
        let mut codec = MockCredentialCodec::new();
        codec
            .expect_verify()
            .returning(|plaintext, hash| hash.as_str() == format!("hashed:{plaintext}"));
        let mut tokens = MockTokenService::new();
        tokens.expect_issue().returning(|user_id, email, ttl| {
            let issued = Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid time");
            Ok(AccessToken::new(
                format!("token-for-{user_id}-{email}"),
                issued,
                issued + ttl,
            ))
        });
        PasswordLoginService::new(
            IdentityStore::new(Arc::new(users), Arc::new(codec)),
            Arc::new(tokens),
            Duration::minutes(30),
        )
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn correct_password_issues_token_even_when_inactive(#[case] is_active: bool) {
        let service = make_service(is_active);
        let creds =
            LoginCredentials::try_from_parts("ada@example.com", "password1").expect("valid");
        let token = service.login(&creds).await.expect("login succeeds");
        assert_eq!(token.as_str(), "token-for-1-ada@example.com");
        assert_eq!(token.expires_in(), 1800);
    }

    #[rstest]
    #[case("ada@example.com", "wrong-password")]
    #[case("bob@example.com", "password1")]
    #[case("ADA@example.com", "password1")]
    #[case("not-an-email", "password1")]
    #[tokio::test]
    async fn failures_are_indistinguishable(#[case] username: &str, #[case] password: &str) {
        let service = make_service(true);
        let creds = LoginCredentials::try_from_parts(username, password).expect("valid shape");
        let err = service.login(&creds).await.expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS_MESSAGE);
    }
}
