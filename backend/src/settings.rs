//! Process settings loaded via OrthoConfig from `EHOTELS_*` variables,
//! configuration files and command-line flags.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_RECONCILE_SECS: u64 = 900;
const DEFAULT_RUN_MIGRATIONS: bool = true;

/// Start-up configuration for the server and the seed binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EHOTELS")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Seconds between background rental reconciliation passes.
    pub reconcile_interval_secs: Option<u64>,
    /// Apply pending migrations before serving.
    pub run_migrations: Option<bool>,
}

/// Settings that cannot be used as given.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("EHOTELS_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("reconcile interval must be positive")]
    ZeroInterval,
}

impl AppSettings {
    /// The configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// The listen address, defaulting to all interfaces on port 8080.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether to migrate on start-up; on unless explicitly disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(DEFAULT_RUN_MIGRATIONS)
    }

    /// Reconciliation period, fifteen minutes unless overridden.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroInterval`] for a zero period.
    pub fn reconcile_interval(&self) -> Result<Duration, SettingsError> {
        match self.reconcile_interval_secs.unwrap_or(DEFAULT_RECONCILE_SECS) {
            0 => Err(SettingsError::ZeroInterval),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
