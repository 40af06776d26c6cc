//! Todo services scoped to the calling identity.
//!
//! The owner is always taken from the [`Caller`], never from the request, so
//! a caller can only ever reach its own todos.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;

use crate::domain::ports::{TodoRepository, TodoRepositoryError, TodosCommand, TodosQuery};
use crate::domain::{Caller, Error, NewTodo, Todo, TodoId, TodoPatch};

/// Map repository failures to domain errors.
pub(crate) fn map_todo_repository_error(error: TodoRepositoryError) -> Error {
    match error {
        TodoRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("todo repository unavailable: {message}"))
        }
        TodoRepositoryError::Query { message } => {
            Error::internal(format!("todo repository error: {message}"))
        }
        TodoRepositoryError::OwnerNotFound { owner_id } => Error::not_found("owner not found")
            .with_details(json!({ "ownerId": owner_id, "code": "owner_not_found" })),
    }
}

fn todo_not_found(id: TodoId) -> Error {
    Error::not_found("todo not found").with_details(json!({ "todoId": id.get() }))
}

/// Todo service implementing the todo driving ports.
pub struct TodoService<T> {
    todos: Arc<T>,
}

impl<T> TodoService<T> {
    /// Create a service over the todo repository.
    pub fn new(todos: Arc<T>) -> Self {
        Self { todos }
    }
}

#[async_trait]
impl<T> TodosCommand for TodoService<T>
where
    T: TodoRepository,
{
    async fn create_todo(&self, caller: &Caller, todo: NewTodo) -> Result<Todo, Error> {
        self.todos
            .create(caller.user().id(), &todo)
            .await
            .map_err(map_todo_repository_error)
    }

    async fn update_todo(
        &self,
        caller: &Caller,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Todo, Error> {
        self.todos
            .update_owned(id, caller.user().id(), &patch)
            .await
            .map_err(map_todo_repository_error)?
            .ok_or_else(|| todo_not_found(id))
    }

    async fn delete_todo(&self, caller: &Caller, id: TodoId) -> Result<Todo, Error> {
        self.todos
            .delete_owned(id, caller.user().id())
            .await
            .map_err(map_todo_repository_error)?
            .ok_or_else(|| todo_not_found(id))
    }
}

#[async_trait]
impl<T> TodosQuery for TodoService<T>
where
    T: TodoRepository,
{
    async fn list_todos(&self, caller: &Caller, page: Page) -> Result<Vec<Todo>, Error> {
        self.todos
            .list_owned(caller.user().id(), page)
            .await
            .map_err(map_todo_repository_error)
    }

    async fn get_todo(&self, caller: &Caller, id: TodoId) -> Result<Todo, Error> {
        self.todos
            .find_owned(id, caller.user().id())
            .await
            .map_err(map_todo_repository_error)?
            .ok_or_else(|| todo_not_found(id))
    }
}
