//! Driven port for the ownership-scoped todo store.
//!
//! Every read and write takes the owner's [`UserId`]. A todo owned by someone
//! else is indistinguishable from a missing one: both come back as `None`.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{NewTodo, Todo, TodoId, TodoPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by todo repository adapters.
    pub enum TodoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "todo repository query failed: {message}",
        /// The referenced owner does not exist.
        OwnerNotFound { owner_id: i64 } => "todo owner {owner_id} does not exist",
    }
}

/// Port for todo persistence restricted to a single owner.
///
/// Mutations are atomic: adapters run each one inside a single transaction
/// (or under a single lock) and leave no partial state behind on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo owned by `owner_id`.
    async fn create(&self, owner_id: UserId, todo: &NewTodo) -> Result<Todo, TodoRepositoryError>;

    /// Fetch a todo when it exists and belongs to `owner_id`.
    async fn find_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<Todo>, TodoRepositoryError>;

    /// List the owner's todos ordered by id ascending.
    async fn list_owned(&self, owner_id: UserId, page: Page)
    -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Merge `patch` into an owned todo. An empty patch returns it unchanged.
    async fn update_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Delete an owned todo and return the removed snapshot.
    async fn delete_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<Todo>, TodoRepositoryError>;
}
