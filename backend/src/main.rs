//! Kudos ledger server: wires the REST endpoints, storage adapter, and
//! OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use kudos_backend::inbound::http::health::HealthState;
use kudos_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use kudos_backend::settings::AppSettings;
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

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let mut config = ServerConfig::new(settings.bind_addr());
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations {
            run_pending_migrations(database_url)
                .await
                .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
        }
        let mut pool_config = PoolConfig::new(database_url);
        if let Some(max) = settings.db_max_connections {
            pool_config = pool_config.with_max_size(max);
        }
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting kudos ledger server");
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
