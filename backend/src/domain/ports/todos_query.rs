//! Driving port for reading the caller's todos.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Caller, Error, Todo, TodoId};

/// Domain use-case port for todo reads scoped to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodosQuery: Send + Sync {
    /// List the caller's todos ordered by id.
    async fn list_todos(&self, caller: &Caller, page: Page) -> Result<Vec<Todo>, Error>;

    /// Fetch one of the caller's todos. Todos owned by others are not found.
    async fn get_todo(&self, caller: &Caller, id: TodoId) -> Result<Todo, Error>;
}
