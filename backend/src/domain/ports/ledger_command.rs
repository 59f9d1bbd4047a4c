//! Driving port for ledger mutations.
//!
//! Requests carry raw caller input; the implementation validates it in the
//! documented order so every adapter reports the same first failure.

use async_trait::async_trait;

use crate::domain::{Account, EndorsementReceipt, Error, Redemption, Transfer};

/// Request to register a student account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub name: String,
}

/// Request to send recognition credits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: i64,
    pub note: Option<String>,
}

/// Request to endorse an existing recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndorseRequest {
    pub transfer_id: i64,
    pub endorser_id: i64,
}

/// Request to convert redeemable credits into a voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemRequest {
    pub account_id: i64,
    pub credits: i64,
}

/// Outcome of an administrative reset sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    /// Accounts whose state changed.
    pub accounts_reset: usize,
}

/// Driving port for ledger write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Register a student seeded with the full monthly allotment.
    async fn create_account(&self, request: CreateAccountRequest) -> Result<Account, Error>;

    /// Move credits between two students.
    ///
    /// Checks, each terminal: amount positive, sender differs from receiver,
    /// both accounts exist, then (after the monthly reset) sendable balance
    /// and monthly cap.
    async fn transfer(&self, request: TransferRequest) -> Result<Transfer, Error>;

    /// Endorse a recognition once per endorser.
    async fn endorse(&self, request: EndorseRequest) -> Result<EndorsementReceipt, Error>;

    /// Convert redeemable credits into a voucher worth five units per credit.
    async fn redeem(&self, request: RedeemRequest) -> Result<Redemption, Error>;

    /// Apply the monthly reset to every account.
    async fn force_reset_all(&self) -> Result<ResetSummary, Error>;
}
