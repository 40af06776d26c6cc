//! Driving port for administrative identity queries.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{AdminCaller, Error, Todo, User, UserId};

/// Identity together with a page of the todos it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithTodos {
    /// The identity.
    pub user: User,
    /// Todos owned by the identity, id ascending.
    pub todos: Vec<Todo>,
}

/// Domain use-case port for listing identities. Admin only.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// List identities ordered by id.
    async fn list_users(&self, admin: &AdminCaller, page: Page) -> Result<Vec<User>, Error>;

    /// Fetch one identity and a page of its todos (read-only).
    async fn user_with_todos(
        &self,
        admin: &AdminCaller,
        id: UserId,
        page: Page,
    ) -> Result<UserWithTodos, Error>;
}
