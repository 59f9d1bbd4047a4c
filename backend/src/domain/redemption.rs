//! Conversion of redeemable credits into vouchers.

use chrono::{DateTime, Utc};

use super::account::Account;
use super::error::Error;
use super::ids::{AccountId, RedemptionId};
use super::transfer::CreditAmount;

/// Voucher value, in currency units, granted per redeemed credit.
pub const VOUCHER_EXCHANGE_RATE: i64 = 5;

/// Values for a redemption about to be appended to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedemption {
    pub account_id: AccountId,
    pub credits: CreditAmount,
    pub voucher_value: i64,
    pub created_at: DateTime<Utc>,
}

impl NewRedemption {
    pub fn into_redemption(self, id: RedemptionId) -> Redemption {
        Redemption {
            id,
            account_id: self.account_id,
            credits: self.credits,
            voucher_value: self.voucher_value,
            created_at: self.created_at,
        }
    }
}

/// An immutable voucher redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub id: RedemptionId,
    pub account_id: AccountId,
    pub credits: CreditAmount,
    pub voucher_value: i64,
    pub created_at: DateTime<Utc>,
}

/// Voucher value for `credits`.
///
/// # Examples
/// ```
/// use kudos_backend::domain::{voucher_value, CreditAmount};
///
/// assert_eq!(voucher_value(CreditAmount::new(40).expect("positive")), 200);
/// ```
pub fn voucher_value(credits: CreditAmount) -> i64 {
    credits.get() * VOUCHER_EXCHANGE_RATE
}

/// Debit `credits` from the account's redeemable balance and return the
/// voucher value. Nothing changes when an error is returned.
pub fn settle_redemption(account: &mut Account, credits: CreditAmount) -> Result<i64, Error> {
    if credits.get() > account.redeemable_balance() {
        return Err(Error::insufficient_redeemable(format!(
            "insufficient redeemable balance: {} available, {} requested",
            account.redeemable_balance(),
            credits.get()
        )));
    }
    account.record_redeemed(credits.get());
    Ok(voucher_value(credits))
}
