//! Backend entry-point: loads settings, prepares the database and serves the
//! site.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use anjoman::domain::{AdminSeeder, SeedOutcome};
use anjoman::inbound::http::health::HealthState;
use anjoman::inbound::http::session_config::{BuildMode, session_settings_from_env};
use anjoman::outbound::persistence::{
    DbPool, DieselAdminRepository, PoolConfig, run_pending_migrations,
};
use anjoman::outbound::security::Argon2PasswordHasher;
use anjoman::outbound::uploads::LocalImageStore;
use anjoman::settings::{AppSettings, RuntimeSettings};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?
        .resolve(&env)
        .map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let pool = prepare_database(&settings).await?;
    LocalImageStore::new(settings.upload_dir.clone())
        .ensure_root()
        .await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr,
        pool,
    )
    .with_directories(settings.static_dir.clone(), settings.upload_dir.clone());

    info!(addr = %settings.bind_addr, "listening");
    create_server(health_state, config)?.await
}

/// Open the pool, apply migrations and make sure the admin account exists.
async fn prepare_database(settings: &RuntimeSettings) -> std::io::Result<DbPool> {
    let pool = DbPool::new(PoolConfig::new(settings.database_url.as_str()))
        .await
        .map_err(std::io::Error::other)?;
    run_pending_migrations(&settings.database_url)
        .await
        .map_err(std::io::Error::other)?;

    let seeder = AdminSeeder::new(
        Arc::new(DieselAdminRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
    );
    match seeder
        .ensure_admin(&settings.admin_username, &settings.admin_password)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
    {
        SeedOutcome::Created => info!(username = %settings.admin_username, "default admin created"),
        SeedOutcome::AlreadyPresent => {}
    }
    Ok(pool)
}
