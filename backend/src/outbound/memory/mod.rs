//! In-process ledger store.
//!
//! Backs the server when no database URL is configured and gives tests a
//! real [`LedgerRepository`] without PostgreSQL. State lives for the lifetime
//! of the process.
//!
//! Each account sits behind its own `tokio::sync::Mutex`; mutations take the
//! guards in ascending id order, which is the same global order the Diesel
//! adapter uses for `SELECT ... FOR UPDATE`. Endorsement uniqueness is a set
//! insert under the endorsement book's lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::ports::{
    LedgerCommit, LedgerRecord, LedgerRepository, LedgerRepositoryError, LedgerWrite,
    LockedAccounts, MutationResult,
};
use crate::domain::{
    Account, AccountId, Endorsement, EndorsementId, EndorsementReceipt, Error, LeaderboardEntry,
    LeaderboardLimit, NewAccount, NewEndorsement, Redemption, RedemptionId, Transfer, TransferId,
    leaderboard_order,
};

#[derive(Debug, Default)]
struct EndorsementBook {
    by_pair: HashMap<(TransferId, AccountId), Endorsement>,
    counts: HashMap<TransferId, i64>,
}

/// Ledger repository holding all state in memory.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    accounts: RwLock<BTreeMap<AccountId, Arc<Mutex<Account>>>>,
    transfers: Mutex<BTreeMap<TransferId, Transfer>>,
    endorsements: Mutex<EndorsementBook>,
    redemptions: Mutex<BTreeMap<RedemptionId, Redemption>>,
}

impl InMemoryLedgerRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every redemption recorded so far, oldest first.
    pub async fn redemptions(&self) -> Vec<Redemption> {
        self.redemptions.lock().await.values().cloned().collect()
    }

    async fn account_handles(
        &self,
        ids: &[AccountId],
    ) -> Result<Vec<Arc<Mutex<Account>>>, LedgerRepositoryError> {
        let accounts = self.accounts.read().await;
        ids.iter()
            .map(|id| {
                accounts
                    .get(id)
                    .cloned()
                    .ok_or_else(|| LedgerRepositoryError::missing_account(id.get()))
            })
            .collect()
    }

    async fn append(&self, write: LedgerWrite) -> Result<Option<LedgerRecord>, LedgerRepositoryError> {
        match write {
            LedgerWrite::Accounts => Ok(None),
            LedgerWrite::Transfer(new_transfer) => {
                let mut transfers = self.transfers.lock().await;
                let id = TransferId::new(next_id(transfers.len())?)
                    .map_err(|err| LedgerRepositoryError::query(err.to_string()))?;
                let transfer = new_transfer.into_transfer(id);
                transfers.insert(id, transfer.clone());
                Ok(Some(LedgerRecord::Transfer(transfer)))
            }
            LedgerWrite::Redemption(new_redemption) => {
                let mut redemptions = self.redemptions.lock().await;
                let id = RedemptionId::new(next_id(redemptions.len())?)
                    .map_err(|err| LedgerRepositoryError::query(err.to_string()))?;
                let redemption = new_redemption.into_redemption(id);
                redemptions.insert(id, redemption.clone());
                Ok(Some(LedgerRecord::Redemption(redemption)))
            }
        }
    }
}

fn next_id(len: usize) -> Result<i64, LedgerRepositoryError> {
    i64::try_from(len)
        .ok()
        .and_then(|len| len.checked_add(1))
        .ok_or_else(|| LedgerRepositoryError::query("identifier space exhausted"))
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn create_account(&self, account: NewAccount) -> Result<Account, LedgerRepositoryError> {
        let mut accounts = self.accounts.write().await;
        let id = AccountId::new(next_id(accounts.len())?)
            .map_err(|err| LedgerRepositoryError::query(err.to_string()))?;
        let account = account.into_account(id);
        accounts.insert(id, Arc::new(Mutex::new(account.clone())));
        Ok(account)
    }

    async fn account_ids(&self) -> Result<Vec<AccountId>, LedgerRepositoryError> {
        Ok(self.accounts.read().await.keys().copied().collect())
    }

    async fn mutate_accounts<F>(&self, ids: &[AccountId], apply: F) -> MutationResult
    where
        F: FnOnce(&mut LockedAccounts) -> Result<LedgerWrite, Error> + Send,
    {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let handles = self.account_handles(&ordered).await?;
        let mut guards: Vec<OwnedMutexGuard<Account>> = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }

        let mut locked = LockedAccounts::new(guards.iter().map(|guard| (**guard).clone()).collect());
        let write = match apply(&mut locked) {
            Ok(write) => write,
            Err(rejection) => return Ok(Err(rejection)),
        };

        let record = self.append(write).await?;
        let changed = locked.changed().count();
        let accounts = locked.into_accounts();
        for (guard, account) in guards.iter_mut().zip(&accounts) {
            **guard = account.clone();
        }

        Ok(Ok(LedgerCommit {
            accounts,
            changed,
            record,
        }))
    }

    async fn find_transfer(
        &self,
        id: TransferId,
    ) -> Result<Option<Transfer>, LedgerRepositoryError> {
        let Some(mut transfer) = self.transfers.lock().await.get(&id).cloned() else {
            return Ok(None);
        };
        transfer.endorsement_count = self
            .endorsements
            .lock()
            .await
            .counts
            .get(&id)
            .copied()
            .unwrap_or_default();
        Ok(Some(transfer))
    }

    async fn insert_endorsement(
        &self,
        endorsement: NewEndorsement,
    ) -> Result<EndorsementReceipt, LedgerRepositoryError> {
        let transfer_id = endorsement.transfer_id;
        let endorser_id = endorsement.endorser_id;

        if !self.transfers.lock().await.contains_key(&transfer_id) {
            return Err(LedgerRepositoryError::missing_transfer(transfer_id.get()));
        }
        if !self.accounts.read().await.contains_key(&endorser_id) {
            return Err(LedgerRepositoryError::missing_account(endorser_id.get()));
        }

        let mut book = self.endorsements.lock().await;
        if book.by_pair.contains_key(&(transfer_id, endorser_id)) {
            return Err(LedgerRepositoryError::duplicate_endorsement(
                transfer_id.get(),
                endorser_id.get(),
            ));
        }
        let id = EndorsementId::new(next_id(book.by_pair.len())?)
            .map_err(|err| LedgerRepositoryError::query(err.to_string()))?;
        let endorsement = endorsement.into_endorsement(id);
        book.by_pair
            .insert((transfer_id, endorser_id), endorsement.clone());
        let count = book.counts.entry(transfer_id).or_insert(0);
        *count += 1;

        Ok(EndorsementReceipt {
            endorsement,
            endorsement_count: *count,
        })
    }

    async fn leaderboard(
        &self,
        limit: LeaderboardLimit,
    ) -> Result<Vec<LeaderboardEntry>, LedgerRepositoryError> {
        let handles: Vec<Arc<Mutex<Account>>> =
            self.accounts.read().await.values().cloned().collect();
        let mut snapshot = Vec::with_capacity(handles.len());
        for handle in handles {
            snapshot.push(handle.lock().await.clone());
        }

        let mut received: HashMap<AccountId, (i64, i64)> = HashMap::new();
        {
            let transfers = self.transfers.lock().await;
            let book = self.endorsements.lock().await;
            for transfer in transfers.values() {
                let endorsements = book.counts.get(&transfer.id).copied().unwrap_or_default();
                let tally = received.entry(transfer.receiver_id).or_default();
                tally.0 += 1;
                tally.1 += endorsements;
            }
        }

        let mut entries: Vec<LeaderboardEntry> = snapshot
            .into_iter()
            .map(|account| {
                let (recognitions, endorsements) =
                    received.get(&account.id()).copied().unwrap_or_default();
                LeaderboardEntry {
                    account_id: account.id(),
                    name: account.name().clone(),
                    total_received: account.total_received(),
                    recognitions_received: recognitions,
                    endorsements_received: endorsements,
                }
            })
            .collect();
        entries.sort_by(leaderboard_order);
        entries.truncate(limit.get());
        Ok(entries)
    }
}
