//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use todo_backend::outbound::persistence::DbPool;
use todo_backend::outbound::security::{Argon2Params, TokenSettings};
use todo_backend::settings::AdminBootstrap;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) argon2: Argon2Params,
    pub(crate) admin: Option<AdminBootstrap>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings, argon2: Argon2Params) -> Self {
        Self {
            bind_addr,
            tokens,
            argon2,
            admin: None,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// When provided, users and todos are stored in PostgreSQL instead of
    /// process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Create this administrator at startup unless the email is taken.
    #[must_use]
    pub fn with_admin(mut self, admin: Option<AdminBootstrap>) -> Self {
        self.admin = admin;
        self
    }
}
