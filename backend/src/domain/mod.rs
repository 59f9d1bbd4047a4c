//! Ledger domain: accounts, recognitions, endorsements and redemptions.
//!
//! Purpose: hold every business rule of the credit ledger behind
//! transport-agnostic types. Inbound adapters call the driving ports in
//! [`ports`]; storage adapters implement [`ports::LedgerRepository`].
//!
//! Public surface:
//! - [`Account`] and the monthly reset policy.
//! - [`Transfer`], [`Endorsement`], [`Redemption`] history records.
//! - [`LeaderboardEntry`] and [`LeaderboardLimit`].
//! - [`LedgerService`], the port implementation.
//! - [`Error`] / [`ErrorCode`], the failure payload shared by all adapters.

pub mod account;
pub mod endorsement;
pub mod error;
pub mod ids;
pub mod leaderboard;
pub mod ledger_service;
pub mod period;
pub mod ports;
pub mod redemption;
pub mod trace_id;
pub mod transfer;

pub use self::account::{
    Account, AccountDraft, AccountValidationError, MAX_CARRY_FORWARD, MONTHLY_ALLOTMENT,
    MONTHLY_SENDING_LIMIT, NewAccount, STUDENT_NAME_MAX, StudentName,
};
pub use self::endorsement::{Endorsement, EndorsementReceipt, NewEndorsement};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{AccountId, EndorsementId, InvalidIdError, RedemptionId, TransferId};
pub use self::leaderboard::{
    DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardLimit, MAX_LEADERBOARD_LIMIT,
    leaderboard_order,
};
pub use self::ledger_service::LedgerService;
pub use self::period::{LedgerNow, LedgerPeriod};
pub use self::redemption::{
    NewRedemption, Redemption, VOUCHER_EXCHANGE_RATE, settle_redemption, voucher_value,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transfer::{
    CreditAmount, NOTE_MAX, NewTransfer, Transfer, TransferValidationError, normalise_note,
    settle_transfer,
};
