//! PostgreSQL-backed `UserRepository`.
//!
//! Email uniqueness is enforced by the `users_email_key` constraint; a clash
//! on insert or update surfaces as `DuplicateEmail`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::Page;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, NewUser, User, UserId, UserUpdate};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

/// `email` names the key being written so clashes can report it.
fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserRepositoryError {
    match (classify_diesel_error(error), email) {
        (DieselFailure::UniqueViolation { .. }, Some(email)) => {
            UserRepositoryError::duplicate_email(email)
        }
        (DieselFailure::Connection(message), _) => UserRepositoryError::connection(message),
        (DieselFailure::Query(message), _) => UserRepositoryError::query(message),
        (DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. }, _) => {
            UserRepositoryError::query("constraint violation")
        }
    }
}

fn to_domain(row: UserRow) -> Result<User, UserRepositoryError> {
    User::try_from(row).map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow::from(user);

        let inserted: UserRow = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(users::table)
                        .values(&row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, Some(user.email.as_ref())))?;

        to_domain(inserted)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(to_domain).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(to_domain).transpose()
    }

    async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, UserRepositoryError> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserChangeset::from(update);

        let row: Option<UserRow> = conn
            .transaction(|conn| {
                async move {
                    diesel::update(users::table.find(id.get()))
                        .set(&changeset)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, update.email.as_ref().map(AsRef::as_ref)))?;

        row.map(to_domain).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order_by(users::id.asc())
            .offset(page.offset_i64())
            .limit(page.limit_i64())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
    use rstest::rstest;

    struct Violation;

    impl DatabaseErrorInformation for Violation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("users_email_key")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation() -> diesel::result::Error {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(Violation))
    }

    #[rstest]
    fn unique_violation_becomes_duplicate_email() {
        assert_eq!(
            map_diesel_error(unique_violation(), Some("a@x.io")),
            UserRepositoryError::duplicate_email("a@x.io")
        );
    }

    #[rstest]
    fn unique_violation_without_email_is_a_query_error() {
        assert!(matches!(
            map_diesel_error(unique_violation(), None),
            UserRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            UserRepositoryError::connection("timed out")
        );
    }
}
