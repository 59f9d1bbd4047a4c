//! Recognition transfers between student accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::{Account, MONTHLY_SENDING_LIMIT};
use super::error::Error;
use super::ids::{AccountId, TransferId};

/// Maximum length of a recognition note, in characters.
pub const NOTE_MAX: usize = 500;

/// Validation errors for transfer inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferValidationError {
    /// Amount is zero or negative.
    #[error("amount must be > 0")]
    NonPositiveAmount,
    /// Sender and receiver are the same account.
    #[error("cannot send credits to yourself")]
    SelfTransfer,
    /// The trimmed note exceeds [`NOTE_MAX`].
    #[error("message must be at most {max} characters")]
    NoteTooLong { max: usize },
}

impl From<TransferValidationError> for Error {
    fn from(value: TransferValidationError) -> Self {
        Error::invalid_request(value.to_string())
    }
}

/// A strictly positive number of credits.
///
/// # Examples
/// ```
/// use kudos_backend::domain::CreditAmount;
///
/// assert!(CreditAmount::new(0).is_err());
/// assert_eq!(CreditAmount::new(25).expect("positive").get(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CreditAmount(i64);

impl CreditAmount {
    /// Validate a raw amount.
    ///
    /// # Errors
    ///
    /// Returns [`TransferValidationError::NonPositiveAmount`] for zero or
    /// negative input.
    pub fn new(raw: i64) -> Result<Self, TransferValidationError> {
        if raw <= 0 {
            return Err(TransferValidationError::NonPositiveAmount);
        }
        Ok(Self(raw))
    }

    /// The amount as a plain integer.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for CreditAmount {
    type Error = TransferValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CreditAmount> for i64 {
    fn from(value: CreditAmount) -> Self {
        value.0
    }
}

/// Normalise an optional note: blank notes are dropped, long ones rejected.
pub fn normalise_note(note: Option<String>) -> Result<Option<String>, TransferValidationError> {
    let Some(note) = note else {
        return Ok(None);
    };
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > NOTE_MAX {
        return Err(TransferValidationError::NoteTooLong { max: NOTE_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}

/// Values for a transfer about to be appended to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: CreditAmount,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewTransfer {
    /// Materialise the record once the store has chosen its id.
    pub fn into_transfer(self, id: TransferId) -> Transfer {
        Transfer {
            id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            amount: self.amount,
            note: self.note,
            created_at: self.created_at,
            endorsement_count: 0,
        }
    }
}

/// An immutable recognition record, reported with its endorsement count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub id: TransferId,
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: CreditAmount,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub endorsement_count: i64,
}

/// Move `amount` from `sender` to `receiver` after checking the sender's
/// balance and monthly cap. Both accounts must already be reset for the
/// current period. Nothing changes when an error is returned.
pub fn settle_transfer(
    sender: &mut Account,
    receiver: &mut Account,
    amount: CreditAmount,
) -> Result<(), Error> {
    let amount = amount.get();
    if amount > sender.sendable_balance() {
        return Err(Error::insufficient_balance(format!(
            "insufficient balance: {} sendable, {amount} requested",
            sender.sendable_balance()
        )));
    }
    if sender.monthly_sent() + amount > MONTHLY_SENDING_LIMIT {
        return Err(Error::sending_limit_exceeded(format!(
            "monthly sending limit exceeded: {} of {MONTHLY_SENDING_LIMIT} already sent",
            sender.monthly_sent()
        )));
    }

    sender.record_sent(amount);
    receiver.record_received(amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{AccountDraft, ErrorCode, StudentName};

    fn account(id: i64, sendable: i64, sent: i64) -> Account {
        Account::new(AccountDraft {
            id: AccountId::new(id).expect("valid id"),
            name: StudentName::new(format!("student {id}")).expect("valid name"),
            sendable_balance: sendable,
            monthly_sent: sent,
            redeemable_balance: 0,
            total_received: 0,
            last_reset: NaiveDate::from_ymd_opt(2026, 2, 1),
            created_at: Utc
                .with_ymd_and_hms(2026, 2, 1, 0, 0, 0)
                .single()
                .expect("valid instant"),
        })
        .expect("valid account")
    }

    #[fixture]
    fn receiver() -> Account {
        account(2, 100, 0)
    }

    fn amount(raw: i64) -> CreditAmount {
        CreditAmount::new(raw).expect("positive amount")
    }

    #[rstest]
    fn settling_conserves_credits(mut receiver: Account) {
        let mut sender = account(1, 100, 0);

        settle_transfer(&mut sender, &mut receiver, amount(40)).expect("transfer settles");

        assert_eq!(sender.sendable_balance(), 60);
        assert_eq!(sender.monthly_sent(), 40);
        assert_eq!(receiver.redeemable_balance(), 40);
        assert_eq!(receiver.total_received(), 40);
        assert_eq!(receiver.sendable_balance(), 100);
    }

    #[rstest]
    fn rejects_amount_above_sendable_balance(mut receiver: Account) {
        let mut sender = account(1, 60, 40);
        let before = (sender.clone(), receiver.clone());

        let err = settle_transfer(&mut sender, &mut receiver, amount(70)).expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::InsufficientBalance);
        assert_eq!((sender, receiver), before);
    }

    #[rstest]
    fn rejects_amount_past_monthly_cap(mut receiver: Account) {
        let mut sender = account(1, 60, 100);

        let err = settle_transfer(&mut sender, &mut receiver, amount(1)).expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::SendingLimitExceeded);
        assert_eq!(sender.sendable_balance(), 60);
    }

    #[rstest]
    fn balance_is_checked_before_cap(mut receiver: Account) {
        let mut sender = account(1, 10, 95);

        let err = settle_transfer(&mut sender, &mut receiver, amount(20)).expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::InsufficientBalance);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn credit_amount_must_be_positive(#[case] raw: i64) {
        assert_eq!(
            CreditAmount::new(raw),
            Err(TransferValidationError::NonPositiveAmount)
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(Some(" thanks! "), Some("thanks!"))]
    fn notes_are_trimmed_and_blank_dropped(
        #[case] input: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let note = normalise_note(input.map(str::to_owned)).expect("valid note");
        assert_eq!(note.as_deref(), expected);
    }

    #[rstest]
    fn long_notes_are_rejected() {
        let note = "a".repeat(NOTE_MAX + 1);
        assert_eq!(
            normalise_note(Some(note)),
            Err(TransferValidationError::NoteTooLong { max: NOTE_MAX })
        );
    }
}
