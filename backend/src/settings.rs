//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `KUDOS_*` environment variables, and an
//! optional configuration file, in OrthoConfig's usual precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Runtime configuration for the kudos server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KUDOS")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. The in-memory ledger is used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Database URL with surrounding whitespace removed; blank counts as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
