//! Backend entry-point: loads settings, migrates the schema, starts the
//! rental reconciler and serves the hotel pages.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ehotels::inbound::http::health::HealthState;
use ehotels::inbound::http::session_config::{BuildMode, session_settings_from_env};
use ehotels::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ehotels::settings::AppSettings;

use server::{ServerConfig, build_state, create_server};

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

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let database_url = settings
        .database_url()
        .map_err(std::io::Error::other)?
        .to_owned();
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let interval = settings
        .reconcile_interval()
        .map_err(std::io::Error::other)?;

    if settings.run_migrations() {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::other)?;
        info!(applied, "schema up to date");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        pool,
    );
    let (http_state, reconciler) = build_state(&config, Arc::new(DefaultClock));
    actix_web::rt::spawn(reconciler.run_every(interval));

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "listening");
    create_server(health_state, http_state, config)?.await
}
