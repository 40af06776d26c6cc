//! Driving port for todo mutations on behalf of the caller.

use async_trait::async_trait;

use crate::domain::{Caller, Error, NewTodo, Todo, TodoId, TodoPatch};

/// Domain use-case port for creating, updating and deleting own todos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodosCommand: Send + Sync {
    /// Create a todo owned by the caller.
    async fn create_todo(&self, caller: &Caller, todo: NewTodo) -> Result<Todo, Error>;

    /// Patch one of the caller's todos.
    async fn update_todo(&self, caller: &Caller, id: TodoId, patch: TodoPatch)
    -> Result<Todo, Error>;

    /// Delete one of the caller's todos, returning the removed snapshot.
    async fn delete_todo(&self, caller: &Caller, id: TodoId) -> Result<Todo, Error>;
}
