//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::ports::{MockLedgerCommand, MockLedgerQuery};
use crate::domain::{Account, AccountDraft, AccountId, StudentName};
use crate::inbound::http::state::HttpState;

/// Fixed instant stamped on sample records.
pub fn sample_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0)
        .single()
        .expect("valid fixture instant")
}

/// Shorthand for a valid account id.
pub fn account_id(raw: i64) -> AccountId {
    AccountId::new(raw).expect("positive fixture id")
}

/// Balances for a sample account, in draft field order.
#[derive(Debug, Clone, Copy)]
pub struct Balances {
    pub sendable: i64,
    pub monthly_sent: i64,
    pub redeemable: i64,
    pub total_received: i64,
}

impl Default for Balances {
    fn default() -> Self {
        Self {
            sendable: 100,
            monthly_sent: 0,
            redeemable: 0,
            total_received: 0,
        }
    }
}

/// Build a validated account reset on 2026-03-01.
pub fn sample_account(id: i64, name: &str, balances: Balances) -> Account {
    Account::new(AccountDraft {
        id: account_id(id),
        name: StudentName::new(name).expect("valid fixture name"),
        sendable_balance: balances.sendable,
        monthly_sent: balances.monthly_sent,
        redeemable_balance: balances.redeemable,
        total_received: balances.total_received,
        last_reset: NaiveDate::from_ymd_opt(2026, 3, 1),
        created_at: sample_instant(),
    })
    .expect("valid fixture account")
}

/// Wrap mocked ports in handler state.
pub fn mock_state(command: MockLedgerCommand, query: MockLedgerQuery) -> HttpState {
    HttpState::new(Arc::new(command), Arc::new(query))
}
