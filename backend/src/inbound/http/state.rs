//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LedgerCommand, LedgerQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub ledger: Arc<dyn LedgerCommand>,
    pub ledger_query: Arc<dyn LedgerQuery>,
}

impl HttpState {
    /// Construct state from the ledger ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use kudos_backend::domain::LedgerService;
    /// use kudos_backend::inbound::http::state::HttpState;
    /// use kudos_backend::outbound::memory::InMemoryLedgerRepository;
    /// use mockable::DefaultClock;
    ///
    /// let service = Arc::new(LedgerService::new(
    ///     Arc::new(InMemoryLedgerRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// let _ledger = state.ledger.clone();
    /// ```
    pub fn new(ledger: Arc<dyn LedgerCommand>, ledger_query: Arc<dyn LedgerQuery>) -> Self {
        Self {
            ledger,
            ledger_query,
        }
    }
}
