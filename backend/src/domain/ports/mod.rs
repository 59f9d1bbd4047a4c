//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`LedgerCommand`], [`LedgerQuery`]) are what inbound
//! adapters call; the driven port ([`LedgerRepository`]) is what storage
//! adapters implement. Each port exposes strongly typed errors so adapters map
//! their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod ledger_command;
mod ledger_query;
mod ledger_repository;

#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{
    CreateAccountRequest, EndorseRequest, LedgerCommand, RedeemRequest, ResetSummary,
    TransferRequest,
};
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
pub use ledger_query::LedgerQuery;
pub use ledger_repository::{
    LedgerCommit, LedgerRecord, LedgerRepository, LedgerRepositoryError, LedgerWrite,
    LockedAccounts, MutationResult,
};
