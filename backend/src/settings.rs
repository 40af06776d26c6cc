//! Server settings loaded via OrthoConfig.
//!
//! Every field can be set through a `TODO_`-prefixed environment variable,
//! for example `TODO_DATABASE_URL`, or the matching command-line flag.

use std::fmt;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::security::Argon2Params;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address could not be parsed.
    #[error("invalid bind address '{value}': {message}")]
    InvalidBindAddr { value: String, message: String },
    /// Only one half of the bootstrap administrator credentials was set.
    #[error("TODO_ADMIN_EMAIL and TODO_ADMIN_PASSWORD must be set together")]
    IncompleteAdmin,
}

/// Configuration values controlling the HTTP server and its stores.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL connection string; absent selects the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Argon2 memory cost override in KiB.
    pub argon2_memory_kib: Option<u32>,
    /// Argon2 pass count override.
    pub argon2_iterations: Option<u32>,
    /// Argon2 parallelism override.
    pub argon2_parallelism: Option<u32>,
    /// Email of an administrator created at startup if missing.
    pub admin_email: Option<String>,
    /// Password for the bootstrap administrator.
    pub admin_password: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Bootstrap administrator credentials, still unvalidated.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AppSettings {
    /// Parsed listen address, `0.0.0.0:8080` unless overridden.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                message: err.to_string(),
            })
    }

    /// Pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Argon2 cost overrides; unset fields keep the library defaults.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Bootstrap administrator, when both email and password are set.
    pub fn admin_bootstrap(&self) -> Result<Option<AdminBootstrap>, SettingsError> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Ok(Some(AdminBootstrap {
                email: email.clone(),
                password: password.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(SettingsError::IncompleteAdmin),
        }
    }
}
