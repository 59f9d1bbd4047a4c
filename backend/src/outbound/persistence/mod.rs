//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Provides the production [`LedgerRepository`](crate::domain::ports::LedgerRepository)
//! backed by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapter**: the repository only translates between Diesel rows and
//!   domain types; ledger rules stay in the domain closure it is handed.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Row locks**: mutations lock account rows in ascending id order inside
//!   one transaction.
//! - **Strongly typed errors**: database failures map onto
//!   [`LedgerRepositoryError`](crate::domain::ports::LedgerRepositoryError).
//!
//! # Example
//!
//! ```ignore
//! use kudos_backend::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/kudos")).await?;
//! let repo = DieselLedgerRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_ledger_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ledger_repository::DieselLedgerRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
