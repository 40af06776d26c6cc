//! Backend entry-point: loads settings, wires the stores and serves the API.

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use todo_backend::inbound::http::health::HealthState;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use todo_backend::outbound::security::token_config::{
    BuildMode, fingerprint::secret_fingerprint, token_settings_from_env,
};
use todo_backend::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = AppSettings::load_from_iter(args)
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let admin = settings.admin_bootstrap().map_err(io::Error::other)?;

    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %secret_fingerprint(&tokens.secret),
        ephemeral = tokens.ephemeral,
        ttl_minutes = tokens.ttl.num_minutes(),
        "token signing configured"
    );

    let mut config = ServerConfig::new(bind_addr, tokens, settings.argon2_params()).with_admin(admin);
    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        info!(applied, "database migrations up to date");
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(|err| io::Error::other(err.into_message()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "listening");
    server.await
}
