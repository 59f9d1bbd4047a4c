//! Student accounts and the monthly reset policy.
//!
//! Every account carries two balances: *sendable* credits, replenished each
//! calendar month, and *redeemable* credits, accumulated from recognitions and
//! convertible into vouchers. The monthly reset is lazy: nothing runs at the
//! turn of the month; instead [`Account::apply_monthly_reset_if_due`] is
//! applied whenever an account is touched.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::AccountId;
use super::period::LedgerPeriod;

/// Credits added to the sendable balance at the start of every month.
pub const MONTHLY_ALLOTMENT: i64 = 100;
/// Maximum credits an account may send within one calendar month.
pub const MONTHLY_SENDING_LIMIT: i64 = 100;
/// Maximum unused sendable credits carried into the next month.
pub const MAX_CARRY_FORWARD: i64 = 50;
/// Maximum length of a student name, in characters.
pub const STUDENT_NAME_MAX: usize = 80;

/// Validation errors raised when constructing accounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// The name is blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// The trimmed name exceeds [`STUDENT_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// A stored balance or counter is below zero.
    #[error("{field} must not be negative")]
    NegativeField { field: &'static str },
    /// Credits sent this month exceed [`MONTHLY_SENDING_LIMIT`].
    #[error("monthly sent {sent} exceeds the monthly sending limit")]
    MonthlySentOverLimit { sent: i64 },
}

/// Display name of the student owning an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    /// Validate and construct a name. Surrounding whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if trimmed.chars().count() > STUDENT_NAME_MAX {
            return Err(AccountValidationError::NameTooLong {
                max: STUDENT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for StudentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for StudentName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentName> for String {
    fn from(value: StudentName) -> Self {
        value.0
    }
}

/// Field bag used to rebuild an [`Account`] from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub id: AccountId,
    pub name: StudentName,
    pub sendable_balance: i64,
    pub monthly_sent: i64,
    pub redeemable_balance: i64,
    pub total_received: i64,
    pub last_reset: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Values for a freshly registered account, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: StudentName,
    pub sendable_balance: i64,
    pub last_reset: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Seed a new account with the full monthly allotment.
    pub fn register(name: StudentName, today: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            name,
            sendable_balance: MONTHLY_ALLOTMENT,
            last_reset: today,
            created_at,
        }
    }

    /// Materialise the account once the store has chosen its id.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            name: self.name,
            sendable_balance: self.sendable_balance,
            monthly_sent: 0,
            redeemable_balance: 0,
            total_received: 0,
            last_reset: Some(self.last_reset),
            created_at: self.created_at,
        }
    }
}

/// A student's ledger account.
///
/// ## Invariants
/// - `sendable_balance`, `redeemable_balance` and `total_received` are never
///   negative.
/// - `0 <= monthly_sent <= MONTHLY_SENDING_LIMIT`.
/// - `total_received` never decreases.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use kudos_backend::domain::{AccountId, NewAccount, StudentName};
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date");
/// let opened = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).single().expect("valid instant");
/// let account = NewAccount::register(StudentName::new("Ada").expect("valid name"), today, opened)
///     .into_account(AccountId::new(1).expect("valid id"));
///
/// assert_eq!(account.id().get(), 1);
/// assert_eq!(account.sendable_balance(), 100);
/// assert_eq!(account.monthly_sent(), 0);
/// assert_eq!(account.redeemable_balance(), 0);
/// assert_eq!(account.last_reset(), Some(today));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    name: StudentName,
    sendable_balance: i64,
    monthly_sent: i64,
    redeemable_balance: i64,
    total_received: i64,
    last_reset: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Rebuild an account, checking the balance invariants.
    pub fn new(draft: AccountDraft) -> Result<Self, AccountValidationError> {
        let AccountDraft {
            id,
            name,
            sendable_balance,
            monthly_sent,
            redeemable_balance,
            total_received,
            last_reset,
            created_at,
        } = draft;

        for (field, value) in [
            ("sendable balance", sendable_balance),
            ("monthly sent", monthly_sent),
            ("redeemable balance", redeemable_balance),
            ("total received", total_received),
        ] {
            if value < 0 {
                return Err(AccountValidationError::NegativeField { field });
            }
        }
        if monthly_sent > MONTHLY_SENDING_LIMIT {
            return Err(AccountValidationError::MonthlySentOverLimit { sent: monthly_sent });
        }

        Ok(Self {
            id,
            name,
            sendable_balance,
            monthly_sent,
            redeemable_balance,
            total_received,
            last_reset,
            created_at,
        })
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Display name of the owning student.
    pub fn name(&self) -> &StudentName {
        &self.name
    }

    /// Credits available to give away.
    pub fn sendable_balance(&self) -> i64 {
        self.sendable_balance
    }

    /// Credits given away since the last reset.
    pub fn monthly_sent(&self) -> i64 {
        self.monthly_sent
    }

    /// Received credits not yet exchanged for vouchers.
    pub fn redeemable_balance(&self) -> i64 {
        self.redeemable_balance
    }

    /// Lifetime credits received; never decreases.
    pub fn total_received(&self) -> i64 {
        self.total_received
    }

    /// Date of the most recent monthly reset, if any has happened.
    pub fn last_reset(&self) -> Option<NaiveDate> {
        self.last_reset
    }

    /// When the account was opened.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Credits still sendable this month under the sending cap.
    pub fn remaining_sending_allowance(&self) -> i64 {
        MONTHLY_SENDING_LIMIT - self.monthly_sent
    }

    /// Roll the account into the period containing `today` if it has not been
    /// rolled there yet. Returns `true` when any field changed.
    ///
    /// - Never reset: stamp `today`; top an empty sendable balance up to the
    ///   allotment.
    /// - Reset in an earlier (or later) month: sendable becomes the allotment
    ///   plus at most [`MAX_CARRY_FORWARD`] unused credits and the monthly
    ///   sent counter returns to zero.
    /// - Same month: nothing happens.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use kudos_backend::domain::{AccountId, NewAccount, StudentName};
    ///
    /// let march = NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date");
    /// let april = NaiveDate::from_ymd_opt(2026, 4, 2).expect("valid date");
    /// let created = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).single().expect("instant");
    /// let mut account = NewAccount::register(StudentName::new("Ada").expect("name"), march, created)
    ///     .into_account(AccountId::new(1).expect("id"));
    ///
    /// assert!(account.apply_monthly_reset_if_due(april));
    /// assert_eq!(account.sendable_balance(), 150);
    /// assert!(!account.apply_monthly_reset_if_due(april));
    /// ```
    pub fn apply_monthly_reset_if_due(&mut self, today: NaiveDate) -> bool {
        let Some(last_reset) = self.last_reset else {
            self.last_reset = Some(today);
            if self.sendable_balance <= 0 {
                self.sendable_balance = MONTHLY_ALLOTMENT;
            }
            return true;
        };

        if LedgerPeriod::of(last_reset) == LedgerPeriod::of(today) {
            return false;
        }

        let carry = self.sendable_balance.clamp(0, MAX_CARRY_FORWARD);
        self.sendable_balance = MONTHLY_ALLOTMENT + carry;
        self.monthly_sent = 0;
        self.last_reset = Some(today);
        true
    }

    pub(crate) fn record_sent(&mut self, amount: i64) {
        self.sendable_balance -= amount;
        self.monthly_sent += amount;
    }

    pub(crate) fn record_received(&mut self, amount: i64) {
        self.redeemable_balance += amount;
        self.total_received += amount;
    }

    pub(crate) fn record_redeemed(&mut self, credits: i64) {
        self.redeemable_balance -= credits;
    }
}
