//! Diesel table definitions for the ledger schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Student accounts and their two balances.
    accounts (id) {
        /// Primary key; ascending, doubles as the lock order.
        id -> Int8,
        name -> Varchar,
        sendable_balance -> Int8,
        monthly_sent -> Int8,
        redeemable_balance -> Int8,
        /// Lifetime credits received; never decreases.
        total_received -> Int8,
        /// Date of the last monthly reset; null until first touched.
        last_reset -> Nullable<Date>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only recognition history.
    transfers (id) {
        id -> Int8,
        sender_id -> Int8,
        receiver_id -> Int8,
        amount -> Int8,
        note -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Endorsements; `(transfer_id, endorser_id)` carries a unique index.
    endorsements (id) {
        id -> Int8,
        transfer_id -> Int8,
        endorser_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only voucher redemptions.
    redemptions (id) {
        id -> Int8,
        account_id -> Int8,
        credits -> Int8,
        voucher_value -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(endorsements -> transfers (transfer_id));
diesel::joinable!(endorsements -> accounts (endorser_id));
diesel::joinable!(redemptions -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, endorsements, redemptions, transfers);
