//! Ledger domain service.
//!
//! Implements the ledger driving ports on top of a [`LedgerRepository`].
//! Every account-touching operation goes through
//! [`LedgerService::lock_and_reset`], which locks the involved accounts and
//! rolls them into the current month before any balance check runs.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateAccountRequest, EndorseRequest, LedgerCommand, LedgerCommit, LedgerQuery, LedgerRecord,
    LedgerRepository, LedgerRepositoryError, LedgerWrite, LockedAccounts, RedeemRequest,
    ResetSummary, TransferRequest,
};
use crate::domain::{
    Account, AccountId, CreditAmount, EndorsementReceipt, Error, LeaderboardEntry,
    LeaderboardLimit, LedgerNow, NewAccount, NewEndorsement, NewRedemption, NewTransfer,
    Redemption, StudentName, Transfer, TransferId, TransferValidationError, normalise_note,
    settle_redemption, settle_transfer,
};

fn map_repository_error(error: LedgerRepositoryError) -> Error {
    match error {
        LedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ledger store unavailable: {message}"))
        }
        LedgerRepositoryError::Query { message } => {
            Error::internal(format!("ledger store error: {message}"))
        }
        LedgerRepositoryError::MissingAccount { id } => {
            Error::not_found(format!("student {id} not found"))
        }
        LedgerRepositoryError::MissingTransfer { id } => {
            Error::not_found(format!("recognition {id} not found"))
        }
        LedgerRepositoryError::DuplicateEndorsement { .. } => {
            Error::duplicate_endorsement("you have already endorsed this recognition")
        }
    }
}

fn account_id(raw: i64) -> Result<AccountId, Error> {
    AccountId::new(raw).map_err(|_| Error::not_found(format!("student {raw} not found")))
}

fn transfer_id(raw: i64) -> Result<TransferId, Error> {
    TransferId::new(raw).map_err(|_| Error::not_found(format!("recognition {raw} not found")))
}

/// Ledger service implementing the command and query driving ports.
pub struct LedgerService<R> {
    ledger_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LedgerService<R> {
    /// Create a new service over `ledger_repo`, reading dates from `clock`.
    pub fn new(ledger_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger_repo, clock }
    }

    fn now(&self) -> LedgerNow {
        LedgerNow::read(self.clock.as_ref())
    }
}

impl<R> LedgerService<R>
where
    R: LedgerRepository,
{
    /// Lock `ids`, apply any due monthly reset to each, then run `apply`.
    ///
    /// This is the only place the reset is triggered. A rejection from `apply`
    /// rolls back the reset together with everything else.
    pub async fn lock_and_reset<F>(
        &self,
        ids: &[AccountId],
        now: LedgerNow,
        apply: F,
    ) -> Result<LedgerCommit, Error>
    where
        F: FnOnce(&mut LockedAccounts) -> Result<LedgerWrite, Error> + Send,
    {
        let today = now.today();
        let outcome = self
            .ledger_repo
            .mutate_accounts(ids, move |accounts: &mut LockedAccounts| {
                for account in accounts.iter_mut() {
                    if account.apply_monthly_reset_if_due(today) {
                        debug!(account_id = %account.id(), %today, "monthly reset applied");
                    }
                }
                apply(accounts)
            })
            .await
            .map_err(map_repository_error)?;

        outcome.inspect_err(|err| {
            debug!(code = ?err.code(), reason = err.message(), "ledger mutation rejected");
        })
    }
}

#[async_trait]
impl<R> LedgerCommand for LedgerService<R>
where
    R: LedgerRepository,
{
    async fn create_account(&self, request: CreateAccountRequest) -> Result<Account, Error> {
        let name = StudentName::new(request.name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let now = self.now();

        let account = self
            .ledger_repo
            .create_account(NewAccount::register(name, now.today(), now.instant()))
            .await
            .map_err(map_repository_error)?;

        info!(account_id = %account.id(), "student account created");
        Ok(account)
    }

    async fn transfer(&self, request: TransferRequest) -> Result<Transfer, Error> {
        let amount = CreditAmount::new(request.amount)?;
        if request.sender_id == request.receiver_id {
            return Err(TransferValidationError::SelfTransfer.into());
        }
        let note = normalise_note(request.note)?;
        let sender_id = account_id(request.sender_id)?;
        let receiver_id = account_id(request.receiver_id)?;
        let now = self.now();

        let commit = self
            .lock_and_reset(&[sender_id, receiver_id], now, move |accounts| {
                let (sender, receiver) = accounts
                    .pair_mut(sender_id, receiver_id)
                    .ok_or_else(|| Error::internal("transfer accounts were not locked"))?;
                settle_transfer(sender, receiver, amount)?;
                Ok(LedgerWrite::Transfer(NewTransfer {
                    sender_id,
                    receiver_id,
                    amount,
                    note,
                    created_at: now.instant(),
                }))
            })
            .await?;

        let Some(LedgerRecord::Transfer(transfer)) = commit.record else {
            return Err(Error::internal("committed transfer was not recorded"));
        };
        info!(
            transfer_id = %transfer.id,
            sender_id = %sender_id,
            receiver_id = %receiver_id,
            amount = amount.get(),
            "recognition recorded"
        );
        Ok(transfer)
    }

    async fn endorse(&self, request: EndorseRequest) -> Result<EndorsementReceipt, Error> {
        let transfer_id = transfer_id(request.transfer_id)?;
        let Ok(endorser_id) = AccountId::new(request.endorser_id) else {
            // The transfer is still reported first when both are unknown.
            self.get_transfer(transfer_id.get()).await?;
            return Err(Error::not_found(format!(
                "student {} not found",
                request.endorser_id
            )));
        };

        let receipt = self
            .ledger_repo
            .insert_endorsement(NewEndorsement {
                transfer_id,
                endorser_id,
                created_at: self.now().instant(),
            })
            .await
            .map_err(map_repository_error)?;

        info!(
            transfer_id = %transfer_id,
            endorser_id = %endorser_id,
            endorsement_count = receipt.endorsement_count,
            "recognition endorsed"
        );
        Ok(receipt)
    }

    async fn redeem(&self, request: RedeemRequest) -> Result<Redemption, Error> {
        let credits = CreditAmount::new(request.credits)
            .map_err(|_| Error::invalid_request("credits must be > 0"))?;
        let account_id = account_id(request.account_id)?;
        let now = self.now();

        let commit = self
            .lock_and_reset(&[account_id], now, move |accounts| {
                let account = accounts
                    .get_mut(account_id)
                    .ok_or_else(|| Error::internal("redeeming account was not locked"))?;
                let voucher_value = settle_redemption(account, credits)?;
                Ok(LedgerWrite::Redemption(NewRedemption {
                    account_id,
                    credits,
                    voucher_value,
                    created_at: now.instant(),
                }))
            })
            .await?;

        let Some(LedgerRecord::Redemption(redemption)) = commit.record else {
            return Err(Error::internal("committed redemption was not recorded"));
        };
        info!(
            redemption_id = %redemption.id,
            account_id = %account_id,
            credits = credits.get(),
            voucher_value = redemption.voucher_value,
            "credits redeemed"
        );
        Ok(redemption)
    }

    async fn force_reset_all(&self) -> Result<ResetSummary, Error> {
        let ids = self
            .ledger_repo
            .account_ids()
            .await
            .map_err(map_repository_error)?;
        let now = self.now();

        let mut accounts_reset = 0;
        for id in ids {
            let commit = self
                .lock_and_reset(&[id], now, |_| Ok(LedgerWrite::Accounts))
                .await?;
            accounts_reset += commit.changed;
        }

        info!(accounts_reset, "monthly reset sweep complete");
        Ok(ResetSummary { accounts_reset })
    }
}

#[async_trait]
impl<R> LedgerQuery for LedgerService<R>
where
    R: LedgerRepository,
{
    async fn get_account(&self, account_id: i64) -> Result<Account, Error> {
        let id = self::account_id(account_id)?;
        let commit = self
            .lock_and_reset(&[id], self.now(), |_| Ok(LedgerWrite::Accounts))
            .await?;

        commit
            .accounts
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("student {account_id} not found")))
    }

    async fn get_transfer(&self, transfer_id: i64) -> Result<Transfer, Error> {
        let id = self::transfer_id(transfer_id)?;
        self.ledger_repo
            .find_transfer(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("recognition {transfer_id} not found")))
    }

    async fn leaderboard(&self, limit: LeaderboardLimit) -> Result<Vec<LeaderboardEntry>, Error> {
        self.ledger_repo
            .leaderboard(limit)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
