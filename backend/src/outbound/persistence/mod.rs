//! PostgreSQL adapters for the identity and todo ports.
//!
//! Built on Diesel with `diesel-async` and a `bb8` pool. Row structs and
//! table definitions stay private to this module; only the repositories,
//! pool handles and the migration runner are exported.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! run_pending_migrations(&url).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let todos = DieselTodoRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_todo_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
