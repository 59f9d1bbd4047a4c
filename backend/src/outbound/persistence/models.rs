//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types go through
//! the validated domain constructors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{accounts, endorsements, redemptions, transfers};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub name: String,
    pub sendable_balance: i64,
    pub monthly_sent: i64,
    pub redeemable_balance: i64,
    pub total_received: i64,
    pub last_reset: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering an account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub name: &'a str,
    pub sendable_balance: i64,
    pub last_reset: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Changeset written back after a locked mutation.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AccountBalancesUpdate {
    pub sendable_balance: i64,
    pub monthly_sent: i64,
    pub redeemable_balance: i64,
    pub total_received: i64,
    pub last_reset: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// History records
// ---------------------------------------------------------------------------

/// Row struct for reading from the transfers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transfers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransferRow {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transfers)]
pub(crate) struct NewTransferRow<'a> {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: i64,
    pub note: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the endorsements table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = endorsements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EndorsementRow {
    pub id: i64,
    pub transfer_id: i64,
    pub endorser_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = endorsements)]
pub(crate) struct NewEndorsementRow {
    pub transfer_id: i64,
    pub endorser_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the redemptions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = redemptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RedemptionRow {
    pub id: i64,
    pub account_id: i64,
    pub credits: i64,
    pub voucher_value: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = redemptions)]
pub(crate) struct NewRedemptionRow {
    pub account_id: i64,
    pub credits: i64,
    pub voucher_value: i64,
    pub created_at: DateTime<Utc>,
}
