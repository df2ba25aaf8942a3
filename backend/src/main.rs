//! Car-hire backend entry-point: loads configuration, migrates the database,
//! provisions the administrator and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carhire::inbound::http::health::HealthState;
use carhire::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, ServerConfig, build_postgres_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let config = ServerConfig::try_from(settings).wrap_err("invalid configuration")?;

    let applied = run_pending_migrations(&config.database_url)
        .await
        .wrap_err("database migration failed")?;
    info!(count = applied.len(), "migrations applied");

    let pool = DbPool::new(
        PoolConfig::new(config.database_url.as_str()).with_max_size(config.db_max_connections),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let (http_state, accounts) = build_postgres_state(&pool, config.jwt_secret.as_str());
    if let Some(admin) = &config.admin {
        match accounts
            .ensure_admin(&admin.email, admin.password.as_str())
            .await
        {
            Ok(Some(user)) => info!(user_id = %user.id(), "administrator provisioned"),
            Ok(None) => info!("administrator already present"),
            Err(err) => return Err(eyre!("administrator provisioning failed: {err}")),
        }
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        http_state,
        config.allowed_origins.clone(),
        config.bind_addr,
    )
    .wrap_err_with(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server listening");
    health_state.mark_ready();
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated abnormally")
}
