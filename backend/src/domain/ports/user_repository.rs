//! Driven port for identity persistence.
//!
//! Uniqueness of the identity key is the repository's job: adapters rely on
//! a store-level constraint rather than a read-then-write check and report
//! clashes as [`UserRepositoryError::DuplicateEmail`].

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Email, NewUser, User, UserId, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another identity already uses the email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Port for storing and looking up identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity and return it with its assigned id.
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch an identity by exact email match.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an identity by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Apply `update` to the identity. Returns `None` when it does not exist.
    ///
    /// An empty update returns the stored identity unchanged.
    async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// List identities ordered by id ascending.
    async fn list(&self, page: Page) -> Result<Vec<User>, UserRepositoryError>;
}
