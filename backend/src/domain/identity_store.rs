//! Identity store: the user repository combined with the credential codec.
//!
//! Plaintext passwords enter here and leave as [`PasswordHash`] values.
//! Hashing and verification are CPU bound, so both run on tokio's blocking
//! pool instead of the request reactor.

use std::sync::Arc;

use pagination::Page;
use serde_json::json;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialCodec, CredentialCodecError, UserChanges, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AccountFlags, Email, Error, NewUser, Password, PasswordHash, User, UserId, UserUpdate,
};

/// Failures raised by [`IdentityStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Another identity already uses the email.
    #[error("email already registered: {email}")]
    DuplicateIdentity {
        /// Rejected email.
        email: String,
    },
    /// No identity has the requested id.
    #[error("user {id} not found")]
    NotFound {
        /// Requested id.
        id: UserId,
    },
    /// Hashing failed.
    #[error(transparent)]
    Codec(#[from] CredentialCodecError),
    /// The blocking hashing task did not complete.
    #[error("password hashing task failed: {message}")]
    Blocking {
        /// Join failure description.
        message: String,
    },
    /// The repository failed.
    #[error(transparent)]
    Persistence(UserRepositoryError),
}

impl From<UserRepositoryError> for IdentityError {
    fn from(value: UserRepositoryError) -> Self {
        match value {
            UserRepositoryError::DuplicateEmail { email } => Self::DuplicateIdentity { email },
            other => Self::Persistence(other),
        }
    }
}

/// Map repository failures that escape to the transport layer.
pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            IdentityError::DuplicateIdentity { email }.into()
        }
    }
}

impl From<IdentityError> for Error {
    fn from(value: IdentityError) -> Self {
        match value {
            IdentityError::DuplicateIdentity { .. } => Error::conflict("email already registered")
                .with_details(json!({ "field": "email", "code": "duplicate_identity" })),
            IdentityError::NotFound { .. } => Error::not_found("user not found"),
            IdentityError::Codec(err) => Error::internal(err.to_string()),
            IdentityError::Blocking { message } => {
                Error::internal(format!("password hashing task failed: {message}"))
            }
            IdentityError::Persistence(err) => map_user_repository_error(err),
        }
    }
}

/// Identity persistence with password hashing on the way in.
pub struct IdentityStore<U, C> {
    users: Arc<U>,
    codec: Arc<C>,
}

impl<U, C> Clone for IdentityStore<U, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<U, C> IdentityStore<U, C> {
    /// Create a store over the given repository and codec.
    pub fn new(users: Arc<U>, codec: Arc<C>) -> Self {
        Self { users, codec }
    }
}

impl<U, C> IdentityStore<U, C>
where
    U: UserRepository,
    C: CredentialCodec + 'static,
{
    /// Hash `password` and insert a new identity.
    ///
    /// Duplicate detection relies on the repository's unique constraint.
    pub async fn create(
        &self,
        email: Email,
        password: &Password,
        flags: AccountFlags,
    ) -> Result<User, IdentityError> {
        let password_hash = self.hash(password).await?;
        let new_user = NewUser {
            email,
            password_hash,
            flags,
        };
        Ok(self.users.create(&new_user).await?)
    }

    /// Look up an identity by exact email.
    pub async fn find_by_key(&self, email: &Email) -> Result<Option<User>, IdentityError> {
        Ok(self.users.find_by_email(email).await?)
    }

    /// Look up an identity by id.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, IdentityError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Apply self-service changes, re-hashing a new password.
    pub async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, IdentityError> {
        let password_hash = match &changes.password {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };
        let update = UserUpdate {
            email: changes.email,
            password_hash,
            is_active: changes.is_active,
        };
        self.users
            .update(id, &update)
            .await?
            .ok_or(IdentityError::NotFound { id })
    }

    /// List identities ordered by id.
    pub async fn list(&self, page: Page) -> Result<Vec<User>, IdentityError> {
        Ok(self.users.list(page).await?)
    }

    /// Whether `plaintext` matches the identity's stored hash.
    pub async fn verify_password(
        &self,
        user: &User,
        plaintext: &str,
    ) -> Result<bool, IdentityError> {
        let codec = Arc::clone(&self.codec);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let hash = user.password_hash().clone();
        tokio::task::spawn_blocking(move || codec.verify(plaintext.as_str(), &hash))
            .await
            .map_err(|err| {
                debug!(error = %err, "password verification task failed");
                IdentityError::Blocking {
                    message: err.to_string(),
                }
            })
    }

    async fn hash(&self, password: &Password) -> Result<PasswordHash, IdentityError> {
        let codec = Arc::clone(&self.codec);
        let password = password.clone();
        let hashed = tokio::task::spawn_blocking(move || codec.hash(password.expose()))
            .await
            .map_err(|err| IdentityError::Blocking {
                message: err.to_string(),
            })?;
        Ok(hashed?)
    }
}

#[cfg(test)]
#[path = "identity_store_tests.rs"]
mod tests;
