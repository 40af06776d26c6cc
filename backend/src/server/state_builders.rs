//! Builders wiring driven adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use tracing::{info, warn};

use todo_backend::domain::ports::{TodoRepository, UserRepository};
use todo_backend::domain::{AccountService, Email, IdentityStore, Password};
use todo_backend::inbound::http::state::HttpState;
use todo_backend::outbound::memory::MemoryStore;
use todo_backend::outbound::persistence::{DieselTodoRepository, DieselUserRepository};
use todo_backend::outbound::security::{Argon2CredentialCodec, JwtTokenService};
use todo_backend::settings::AdminBootstrap;

use super::ServerConfig;

/// Build HTTP state over PostgreSQL when a pool is configured, otherwise
/// over the in-memory store.
///
/// # Errors
/// Fails when the Argon2 parameters are rejected or the bootstrap
/// administrator cannot be created.
pub(crate) async fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let codec = Arc::new(
        Argon2CredentialCodec::new(config.argon2)
            .map_err(|err| io::Error::other(format!("invalid Argon2 settings: {err}")))?,
    );

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL store");
            let users = Arc::new(DieselUserRepository::new(pool.clone()));
            let todos = Arc::new(DieselTodoRepository::new(pool.clone()));
            wire(users, todos, codec, config).await
        }
        None => {
            warn!("no database configured; using in-memory store, data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            wire(store.clone(), store, codec, config).await
        }
    }
}

async fn wire<U, T>(
    users: Arc<U>,
    todos: Arc<T>,
    codec: Arc<Argon2CredentialCodec>,
    config: &ServerConfig,
) -> io::Result<HttpState>
where
    U: UserRepository + 'static,
    T: TodoRepository + 'static,
{
    if let Some(admin) = &config.admin {
        let identities = IdentityStore::new(users.clone(), codec.clone());
        let accounts = AccountService::new(identities, todos.clone());
        bootstrap_admin(&accounts, admin).await?;
    }

    let tokens = Arc::new(JwtTokenService::new(&config.tokens.secret));
    Ok(HttpState::from_adapters(
        users,
        todos,
        codec,
        tokens,
        config.tokens.ttl,
    ))
}

async fn bootstrap_admin<U, T>(
    accounts: &AccountService<U, Argon2CredentialCodec, T>,
    admin: &AdminBootstrap,
) -> io::Result<()>
where
    U: UserRepository,
    T: TodoRepository,
{
    let email = Email::new(&admin.email)
        .map_err(|err| io::Error::other(format!("invalid TODO_ADMIN_EMAIL: {err}")))?;
    let password = Password::new(&admin.password)
        .map_err(|err| io::Error::other(format!("invalid TODO_ADMIN_PASSWORD: {err}")))?;
    accounts
        .ensure_admin(email, &password)
        .await
        .map(|_| ())
        .map_err(|err| io::Error::other(format!("bootstrap administrator failed: {err}")))
}
