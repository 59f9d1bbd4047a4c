//! Builders wiring the ledger service to a storage adapter.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use kudos_backend::domain::LedgerService;
use kudos_backend::domain::ports::LedgerRepository;
use kudos_backend::inbound::http::state::HttpState;
use kudos_backend::outbound::memory::InMemoryLedgerRepository;
use kudos_backend::outbound::persistence::DieselLedgerRepository;

use super::ServerConfig;

/// Wrap a repository in one service serving both ledger ports.
fn ledger_state<R>(repo: Arc<R>) -> HttpState
where
    R: LedgerRepository + 'static,
{
    let service = Arc::new(LedgerService::new(repo, Arc::new(DefaultClock)));
    HttpState::new(service.clone(), service)
}

/// Build the shared HTTP state, persisting to PostgreSQL when a pool is
/// configured and keeping the ledger in memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("ledger backed by PostgreSQL");
            ledger_state(Arc::new(DieselLedgerRepository::new(pool.clone())))
        }
        None => {
            info!("ledger held in memory; balances are lost on restart");
            ledger_state(Arc::new(InMemoryLedgerRepository::new()))
        }
    };
    web::Data::new(state)
}
