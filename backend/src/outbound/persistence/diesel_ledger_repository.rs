//! PostgreSQL-backed `LedgerRepository` implementation using Diesel ORM.
//!
//! Mutations run in one transaction that locks the involved account rows with
//! `SELECT ... ORDER BY id FOR UPDATE`, so concurrent transfers touching the
//! same accounts serialise in a global order and cannot deadlock.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    LedgerCommit, LedgerRecord, LedgerRepository, LedgerRepositoryError, LedgerWrite,
    LockedAccounts, MutationResult,
};
use crate::domain::{
    Account, AccountDraft, AccountId, CreditAmount, Endorsement, EndorsementId,
    EndorsementReceipt, Error, LeaderboardEntry, LeaderboardLimit, NewAccount, NewEndorsement,
    Redemption, RedemptionId, StudentName, Transfer, TransferId,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{
    AccountBalancesUpdate, AccountRow, EndorsementRow, NewAccountRow, NewEndorsementRow,
    NewRedemptionRow, NewTransferRow, RedemptionRow, TransferRow,
};
use super::pool::DbPool;
use super::schema::{accounts, endorsements, redemptions, transfers};

/// Diesel-backed implementation of the ledger repository port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a ledger transaction. Every variant rolls back.
#[derive(Debug)]
enum TxError {
    Diesel(DieselError),
    Repository(LedgerRepositoryError),
    Rejected(Error),
}

impl From<DieselError> for TxError {
    fn from(value: DieselError) -> Self {
        Self::Diesel(value)
    }
}

impl From<LedgerRepositoryError> for TxError {
    fn from(value: LedgerRepositoryError) -> Self {
        Self::Repository(value)
    }
}

fn corrupt_row(what: &str, err: impl std::fmt::Display) -> LedgerRepositoryError {
    LedgerRepositoryError::query(format!("invalid {what} row: {err}"))
}

fn row_to_account(row: AccountRow) -> Result<Account, LedgerRepositoryError> {
    let AccountRow {
        id,
        name,
        sendable_balance,
        monthly_sent,
        redeemable_balance,
        total_received,
        last_reset,
        created_at,
    } = row;

    Account::new(AccountDraft {
        id: AccountId::new(id).map_err(|err| corrupt_row("account", err))?,
        name: StudentName::new(name).map_err(|err| corrupt_row("account", err))?,
        sendable_balance,
        monthly_sent,
        redeemable_balance,
        total_received,
        last_reset,
        created_at,
    })
    .map_err(|err| corrupt_row("account", err))
}

fn row_to_transfer(row: TransferRow, endorsement_count: i64) -> Result<Transfer, LedgerRepositoryError> {
    Ok(Transfer {
        id: TransferId::new(row.id).map_err(|err| corrupt_row("transfer", err))?,
        sender_id: AccountId::new(row.sender_id).map_err(|err| corrupt_row("transfer", err))?,
        receiver_id: AccountId::new(row.receiver_id).map_err(|err| corrupt_row("transfer", err))?,
        amount: CreditAmount::new(row.amount).map_err(|err| corrupt_row("transfer", err))?,
        note: row.note,
        created_at: row.created_at,
        endorsement_count,
    })
}

fn row_to_endorsement(row: EndorsementRow) -> Result<Endorsement, LedgerRepositoryError> {
    Ok(Endorsement {
        id: EndorsementId::new(row.id).map_err(|err| corrupt_row("endorsement", err))?,
        transfer_id: TransferId::new(row.transfer_id)
            .map_err(|err| corrupt_row("endorsement", err))?,
        endorser_id: AccountId::new(row.endorser_id)
            .map_err(|err| corrupt_row("endorsement", err))?,
        created_at: row.created_at,
    })
}

fn row_to_redemption(row: RedemptionRow) -> Result<Redemption, LedgerRepositoryError> {
    Ok(Redemption {
        id: RedemptionId::new(row.id).map_err(|err| corrupt_row("redemption", err))?,
        account_id: AccountId::new(row.account_id)
            .map_err(|err| corrupt_row("redemption", err))?,
        credits: CreditAmount::new(row.credits).map_err(|err| corrupt_row("redemption", err))?,
        voucher_value: row.voucher_value,
        created_at: row.created_at,
    })
}

impl From<&Account> for AccountBalancesUpdate {
    fn from(account: &Account) -> Self {
        Self {
            sendable_balance: account.sendable_balance(),
            monthly_sent: account.monthly_sent(),
            redeemable_balance: account.redeemable_balance(),
            total_received: account.total_received(),
            last_reset: account.last_reset(),
        }
    }
}

async fn count_endorsements(
    conn: &mut AsyncPgConnection,
    transfer_id: i64,
) -> Result<i64, DieselError> {
    endorsements::table
        .filter(endorsements::transfer_id.eq(transfer_id))
        .count()
        .get_result(conn)
        .await
}

async fn append_record(
    conn: &mut AsyncPgConnection,
    write: LedgerWrite,
) -> Result<Option<LedgerRecord>, TxError> {
    match write {
        LedgerWrite::Accounts => Ok(None),
        LedgerWrite::Transfer(new_transfer) => {
            let row: TransferRow = diesel::insert_into(transfers::table)
                .values(&NewTransferRow {
                    sender_id: new_transfer.sender_id.get(),
                    receiver_id: new_transfer.receiver_id.get(),
                    amount: new_transfer.amount.get(),
                    note: new_transfer.note.as_deref(),
                    created_at: new_transfer.created_at,
                })
                .returning(TransferRow::as_returning())
                .get_result(conn)
                .await?;
            Ok(Some(LedgerRecord::Transfer(row_to_transfer(row, 0)?)))
        }
        LedgerWrite::Redemption(new_redemption) => {
            let row: RedemptionRow = diesel::insert_into(redemptions::table)
                .values(&NewRedemptionRow {
                    account_id: new_redemption.account_id.get(),
                    credits: new_redemption.credits.get(),
                    voucher_value: new_redemption.voucher_value,
                    created_at: new_redemption.created_at,
                })
                .returning(RedemptionRow::as_returning())
                .get_result(conn)
                .await?;
            Ok(Some(LedgerRecord::Redemption(row_to_redemption(row)?)))
        }
    }
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn create_account(&self, account: NewAccount) -> Result<Account, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: AccountRow = diesel::insert_into(accounts::table)
            .values(&NewAccountRow {
                name: account.name.as_ref(),
                sendable_balance: account.sendable_balance,
                last_reset: account.last_reset,
                created_at: account.created_at,
            })
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_account(row)
    }

    async fn account_ids(&self) -> Result<Vec<AccountId>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<i64> = accounts::table
            .select(accounts::id)
            .order(accounts::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        ids.into_iter()
            .map(|id| AccountId::new(id).map_err(|err| corrupt_row("account", err)))
            .collect()
    }

    async fn mutate_accounts<F>(&self, ids: &[AccountId], apply: F) -> MutationResult
    where
        F: FnOnce(&mut LockedAccounts) -> Result<LedgerWrite, Error> + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut ordered: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        ordered.sort_unstable();
        ordered.dedup();

        let outcome = conn
            .transaction::<LedgerCommit, TxError, _>(|conn| {
                async move {
                    let rows: Vec<AccountRow> = accounts::table
                        .filter(accounts::id.eq_any(&ordered))
                        .order(accounts::id.asc())
                        .for_update()
                        .select(AccountRow::as_select())
                        .load(conn)
                        .await?;

                    if let Some(missing) = ordered
                        .iter()
                        .find(|id| !rows.iter().any(|row| row.id == **id))
                    {
                        return Err(LedgerRepositoryError::missing_account(*missing).into());
                    }

                    let accounts = rows
                        .into_iter()
                        .map(row_to_account)
                        .collect::<Result<Vec<_>, _>>()?;
                    let mut locked = LockedAccounts::new(accounts);
                    let write = apply(&mut locked).map_err(TxError::Rejected)?;

                    for account in locked.changed() {
                        diesel::update(accounts::table.find(account.id().get()))
                            .set(&AccountBalancesUpdate::from(account))
                            .execute(conn)
                            .await?;
                    }
                    let record = append_record(conn, write).await?;
                    let changed = locked.changed().count();

                    Ok(LedgerCommit {
                        accounts: locked.into_accounts(),
                        changed,
                        record,
                    })
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(commit) => Ok(Ok(commit)),
            Err(TxError::Rejected(rejection)) => Ok(Err(rejection)),
            Err(TxError::Repository(err)) => Err(err),
            Err(TxError::Diesel(err)) => Err(map_diesel_error(err)),
        }
    }

    async fn find_transfer(
        &self,
        id: TransferId,
    ) -> Result<Option<Transfer>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(row) = transfers::table
            .find(id.get())
            .select(TransferRow::as_select())
            .first::<TransferRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let count = count_endorsements(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;

        row_to_transfer(row, count).map(Some)
    }

    async fn insert_endorsement(
        &self,
        endorsement: NewEndorsement,
    ) -> Result<EndorsementReceipt, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let transfer_id = endorsement.transfer_id.get();
        let endorser_id = endorsement.endorser_id.get();

        let outcome = conn
            .transaction::<EndorsementReceipt, TxError, _>(|conn| {
                async move {
                    let transfer: Option<i64> = transfers::table
                        .find(transfer_id)
                        .select(transfers::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if transfer.is_none() {
                        return Err(LedgerRepositoryError::missing_transfer(transfer_id).into());
                    }

                    let endorser: Option<i64> = accounts::table
                        .find(endorser_id)
                        .select(accounts::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if endorser.is_none() {
                        return Err(LedgerRepositoryError::missing_account(endorser_id).into());
                    }

                    let row: EndorsementRow = diesel::insert_into(endorsements::table)
                        .values(&NewEndorsementRow {
                            transfer_id,
                            endorser_id,
                            created_at: endorsement.created_at,
                        })
                        .returning(EndorsementRow::as_returning())
                        .get_result(conn)
                        .await
                        .map_err(|err| {
                            if is_unique_violation(&err) {
                                TxError::Repository(LedgerRepositoryError::duplicate_endorsement(
                                    transfer_id,
                                    endorser_id,
                                ))
                            } else {
                                TxError::Diesel(err)
                            }
                        })?;
                    let endorsement_count = count_endorsements(conn, transfer_id).await?;

                    Ok(EndorsementReceipt {
                        endorsement: row_to_endorsement(row)?,
                        endorsement_count,
                    })
                }
                .scope_boxed()
            })
            .await;

        outcome.map_err(|err| match err {
            TxError::Diesel(err) => map_diesel_error(err),
            TxError::Repository(err) => err,
            TxError::Rejected(rejection) => LedgerRepositoryError::query(rejection.to_string()),
        })
    }

    async fn leaderboard(
        &self,
        limit: LeaderboardLimit,
    ) -> Result<Vec<LeaderboardEntry>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let limit = i64::try_from(limit.get())
            .map_err(|_| LedgerRepositoryError::query("leaderboard limit out of range"))?;

        let rows: Vec<AccountRow> = accounts::table
            .order((accounts::total_received.desc(), accounts::id.asc()))
            .limit(limit)
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let recognitions: HashMap<i64, i64> = transfers::table
            .filter(transfers::receiver_id.eq_any(&ids))
            .group_by(transfers::receiver_id)
            .select((transfers::receiver_id, diesel::dsl::count_star()))
            .load::<(i64, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        let endorsed: HashMap<i64, i64> = endorsements::table
            .inner_join(transfers::table)
            .filter(transfers::receiver_id.eq_any(&ids))
            .group_by(transfers::receiver_id)
            .select((transfers::receiver_id, diesel::dsl::count(endorsements::id)))
            .load::<(i64, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                let account = row_to_account(row)?;
                Ok(LeaderboardEntry {
                    account_id: account.id(),
                    name: account.name().clone(),
                    total_received: account.total_received(),
                    recognitions_received: recognitions.get(&id).copied().unwrap_or_default(),
                    endorsements_received: endorsed.get(&id).copied().unwrap_or_default(),
                })
            })
            .collect()
    }
}
