//! Apply migrations and load the demonstration dataset.
//!
//! Reads the same `EHOTELS_*` settings as the server. Running it twice is
//! harmless: a database that already has hotel chains is left untouched.

use chrono::Utc;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ehotels::outbound::persistence::{
    DbPool, PoolConfig, SeedOutcome, run_pending_migrations, seed_demo_data,
};
use ehotels::settings::AppSettings;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let database_url = settings
        .database_url()
        .map_err(std::io::Error::other)?
        .to_owned();

    let url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(applied, "schema up to date");

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .map_err(std::io::Error::other)?;
    match seed_demo_data(&pool, Utc::now().date_naive())
        .await
        .map_err(std::io::Error::other)?
    {
        SeedOutcome::Seeded(summary) => info!(
            hotels = summary.hotels,
            rooms = summary.rooms,
            "seed complete; log in as customer \"Ann Lee\" or any seeded employee"
        ),
        SeedOutcome::AlreadyPopulated => info!("nothing to do"),
    }
    Ok(())
}
