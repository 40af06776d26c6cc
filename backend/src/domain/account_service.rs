//! Account services: registration, self-service updates and admin listing.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use tracing::info;

use crate::domain::identity_store::{IdentityError, IdentityStore};
use crate::domain::ports::{
    CredentialCodec, TodoRepository, UserChanges, UserRepository, UserWithTodos, UsersCommand,
    UsersQuery,
};
use crate::domain::todo_service::map_todo_repository_error;
use crate::domain::{AccountFlags, AdminCaller, Caller, Email, Error, Password, User, UserId};

/// Account service implementing the identity driving ports.
pub struct AccountService<U, C, T> {
    identities: IdentityStore<U, C>,
    todos: Arc<T>,
}

impl<U, C, T> AccountService<U, C, T> {
    /// Create a service over the identity store and todo repository.
    pub fn new(identities: IdentityStore<U, C>, todos: Arc<T>) -> Self {
        Self { identities, todos }
    }
}

impl<U, C, T> AccountService<U, C, T>
where
    U: UserRepository,
    C: CredentialCodec + 'static,
    T: TodoRepository,
{
    /// Create an active administrator unless the email is already taken.
    ///
    /// Returns `true` when a new account was created. An existing identity
    /// keeps its flags and password.
    pub async fn ensure_admin(&self, email: Email, password: &Password) -> Result<bool, Error> {
        match self
            .identities
            .create(email, password, AccountFlags::admin())
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id(), "bootstrap administrator created");
                Ok(true)
            }
            Err(IdentityError::DuplicateIdentity { .. }) => {
                info!("bootstrap administrator already registered");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl<U, C, T> UsersCommand for AccountService<U, C, T>
where
    U: UserRepository,
    C: CredentialCodec + 'static,
    T: TodoRepository,
{
    async fn register(&self, email: Email, password: Password) -> Result<User, Error> {
        let user = self
            .identities
            .create(email, &password, AccountFlags::default())
            .await?;
        info!(user_id = %user.id(), "identity registered");
        Ok(user)
    }

    async fn update_me(&self, caller: &Caller, changes: UserChanges) -> Result<User, Error> {
        if changes.is_empty() {
            return Ok(caller.user().clone());
        }
        Ok(self.identities.update(caller.user().id(), changes).await?)
    }
}

#[async_trait]
impl<U, C, T> UsersQuery for AccountService<U, C, T>
where
    U: UserRepository,
    C: CredentialCodec + 'static,
    T: TodoRepository,
{
    async fn list_users(&self, _admin: &AdminCaller, page: Page) -> Result<Vec<User>, Error> {
        Ok(self.identities.list(page).await?)
    }

    async fn user_with_todos(
        &self,
        _admin: &AdminCaller,
        id: UserId,
        page: Page,
    ) -> Result<UserWithTodos, Error> {
        let user = self
            .identities
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::from(IdentityError::NotFound { id }))?;
        let todos = self
            .todos
            .list_owned(id, page)
            .await
            .map_err(map_todo_repository_error)?;
        Ok(UserWithTodos { user, todos })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
