//! Shared helpers for the PostgreSQL-backed integration tests.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_ledger_database, shared_cluster_handle};
