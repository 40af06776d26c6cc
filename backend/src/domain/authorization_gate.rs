//! Token-based authorization gate.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::identity_store::map_user_repository_error;
use crate::domain::ports::{AuthorizationGate, TokenService, UserRepository};
use crate::domain::{Email, Error, ResolvedIdentity, UNAUTHENTICATED_MESSAGE};

/// Resolves bearer tokens to identities through the token service and the
/// user repository.
pub struct TokenAuthorizationGate<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
}

impl<U, T> TokenAuthorizationGate<U, T> {
    /// Create a gate over the given repository and token service.
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }
}

fn unauthenticated() -> Error {
    Error::unauthorized(UNAUTHENTICATED_MESSAGE)
}

#[async_trait]
impl<U, T> AuthorizationGate for TokenAuthorizationGate<U, T>
where
    U: UserRepository,
    T: TokenService,
{
    async fn resolve(&self, token: &str) -> Result<ResolvedIdentity, Error> {
        let subject = self.tokens.verify(token).map_err(|_| unauthenticated())?;
        let email = Email::new(subject.email()).map_err(|err| {
            debug!(error = %err, "token subject is not a valid email");
            unauthenticated()
        })?;
        match self.users.find_by_email(&email).await {
            Ok(Some(user)) if user.id() == subject.user_id() => Ok(ResolvedIdentity::new(user)),
            Ok(Some(user)) => {
                debug!(
                    token_user_id = %subject.user_id(),
                    user_id = %user.id(),
                    "token subject now belongs to another identity"
                );
                Err(unauthenticated())
            }
            Ok(None) => {
                debug!("token subject no longer exists");
                Err(unauthenticated())
            }
            Err(err) => Err(map_user_repository_error(err)),
        }
    }
}
