//! PostgreSQL-backed `TodoRepository`.
//!
//! Every statement filters on both `id` and `owner_id`, so rows belonging to
//! another owner are never read or written.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::Page;

use crate::domain::ports::{TodoRepository, TodoRepositoryError};
use crate::domain::{NewTodo, Todo, TodoId, TodoPatch, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewTodoRow, TodoChangeset, TodoRow};
use super::pool::{DbPool, PoolError};
use super::schema::todos;

/// Diesel implementation of [`TodoRepository`].
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TodoRepositoryError {
    TodoRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, owner_id: UserId) -> TodoRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::ForeignKeyViolation { .. } => {
            TodoRepositoryError::owner_not_found(owner_id.get())
        }
        DieselFailure::Connection(message) => TodoRepositoryError::connection(message),
        DieselFailure::Query(message) => TodoRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => TodoRepositoryError::query("constraint violation"),
    }
}

fn to_domain(row: TodoRow) -> Result<Todo, TodoRepositoryError> {
    Todo::try_from(row).map_err(TodoRepositoryError::query)
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn create(&self, owner_id: UserId, todo: &NewTodo) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTodoRow::new(owner_id, todo);

        let inserted: TodoRow = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(todos::table)
                        .values(&row)
                        .returning(TodoRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, owner_id))?;

        to_domain(inserted)
    }

    async fn find_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TodoRow> = todos::table
            .filter(todos::id.eq(id.get()))
            .filter(todos::owner_id.eq(owner_id.get()))
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, owner_id))?;

        row.map(to_domain).transpose()
    }

    async fn list_owned(
        &self,
        owner_id: UserId,
        page: Page,
    ) -> Result<Vec<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TodoRow> = todos::table
            .filter(todos::owner_id.eq(owner_id.get()))
            .order_by(todos::id.asc())
            .offset(page.offset_i64())
            .limit(page.limit_i64())
            .select(TodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, owner_id))?;

        rows.into_iter().map(to_domain).collect()
    }

    async fn update_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = TodoChangeset::from(patch);
        let is_empty = patch.is_empty();

        let row: Option<TodoRow> = conn
            .transaction(|conn| {
                async move {
                    let current: Option<TodoRow> = todos::table
                        .filter(todos::id.eq(id.get()))
                        .filter(todos::owner_id.eq(owner_id.get()))
                        .select(TodoRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;

                    match current {
                        Some(row) if !is_empty => diesel::update(todos::table.find(row.id))
                            .set(&changeset)
                            .returning(TodoRow::as_returning())
                            .get_result(conn)
                            .await
                            .map(Some),
                        other => Ok(other),
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, owner_id))?;

        row.map(to_domain).transpose()
    }

    async fn delete_owned(
        &self,
        id: TodoId,
        owner_id: UserId,
    ) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TodoRow> = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(
                        todos::table
                            .filter(todos::id.eq(id.get()))
                            .filter(todos::owner_id.eq(owner_id.get())),
                    )
                    .returning(TodoRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, owner_id))?;

        row.map(to_domain).transpose()
    }
}
