//! Driving port for ledger reads.

use async_trait::async_trait;

use crate::domain::{Account, Error, LeaderboardEntry, LeaderboardLimit, Transfer};

/// Driving port for ledger read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch an account, applying and persisting a due monthly reset first.
    async fn get_account(&self, account_id: i64) -> Result<Account, Error>;

    /// Fetch a recognition with its endorsement count.
    async fn get_transfer(&self, transfer_id: i64) -> Result<Transfer, Error>;

    /// Top students by credits received; ties rank the older account first.
    async fn leaderboard(&self, limit: LeaderboardLimit) -> Result<Vec<LeaderboardEntry>, Error>;
}
