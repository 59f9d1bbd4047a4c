//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed ledger store using Diesel ORM.
//! - **memory**: in-process ledger store for tests and database-less runs.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
