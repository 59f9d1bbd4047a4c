//! Driven port for ledger persistence.
//!
//! Balance-changing operations go through [`LedgerRepository::mutate_accounts`]:
//! the adapter locks every listed account in ascending id order, hands working
//! copies to a domain closure, and commits the changed accounts together with
//! at most one history record. A closure rejection rolls everything back.

use async_trait::async_trait;

use crate::domain::{
    Account, AccountId, EndorsementReceipt, Error, LeaderboardEntry, LeaderboardLimit,
    NewAccount, NewEndorsement, NewRedemption, NewTransfer, Redemption, Transfer, TransferId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger repository adapters.
    pub enum LedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ledger repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ledger repository query failed: {message}",
        /// A referenced account does not exist.
        MissingAccount { id: i64 } =>
            "account {id} not found",
        /// A referenced transfer does not exist.
        MissingTransfer { id: i64 } =>
            "recognition {id} not found",
        /// The endorser already endorsed the transfer.
        DuplicateEndorsement { transfer_id: i64, endorser_id: i64 } =>
            "account {endorser_id} already endorsed recognition {transfer_id}",
    }
}

/// Working copies of the accounts locked for one mutation, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedAccounts {
    original: Vec<Account>,
    current: Vec<Account>,
}

impl LockedAccounts {
    /// Wrap freshly loaded accounts. Order is normalised to ascending id.
    pub fn new(mut accounts: Vec<Account>) -> Self {
        accounts.sort_by_key(Account::id);
        Self {
            original: accounts.clone(),
            current: accounts,
        }
    }

    /// Current state of a locked account.
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.current.iter().find(|account| account.id() == id)
    }

    /// Mutable access to one locked account.
    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.current.iter_mut().find(|account| account.id() == id)
    }

    /// Mutable access to two distinct accounts at once.
    pub fn pair_mut(
        &mut self,
        first: AccountId,
        second: AccountId,
    ) -> Option<(&mut Account, &mut Account)> {
        if first == second {
            return None;
        }
        let first_idx = self.current.iter().position(|a| a.id() == first)?;
        let second_idx = self.current.iter().position(|a| a.id() == second)?;
        if first_idx < second_idx {
            let (head, tail) = self.current.split_at_mut(second_idx);
            Some((&mut head[first_idx], &mut tail[0]))
        } else {
            let (head, tail) = self.current.split_at_mut(first_idx);
            Some((&mut tail[0], &mut head[second_idx]))
        }
    }

    /// Every locked account, ascending by id.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.current.iter_mut()
    }

    /// Accounts whose state differs from what was loaded.
    pub fn changed(&self) -> impl Iterator<Item = &Account> {
        self.current
            .iter()
            .zip(&self.original)
            .filter(|(current, original)| current != original)
            .map(|(current, _)| current)
    }

    /// Final state of every locked account, ascending by id.
    pub fn into_accounts(self) -> Vec<Account> {
        self.current
    }
}

/// History record a mutation asks the adapter to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    /// Only account state changes.
    Accounts,
    Transfer(NewTransfer),
    Redemption(NewRedemption),
}

/// History record appended by a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRecord {
    Transfer(Transfer),
    Redemption(Redemption),
}

/// Outcome of a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCommit {
    /// Post-commit state of every locked account, ascending by id.
    pub accounts: Vec<Account>,
    /// Number of accounts whose state was written.
    pub changed: usize,
    pub record: Option<LedgerRecord>,
}

/// Result of [`LedgerRepository::mutate_accounts`]: the outer error reports
/// infrastructure failures, the inner one a rolled-back domain rejection.
pub type MutationResult = Result<Result<LedgerCommit, Error>, LedgerRepositoryError>;

/// Port for reading and atomically updating ledger state.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    async fn create_account(&self, account: NewAccount) -> Result<Account, LedgerRepositoryError>;

    /// Ids of every account, ascending.
    async fn account_ids(&self) -> Result<Vec<AccountId>, LedgerRepositoryError>;

    /// Lock `ids` in ascending order, run `apply` on working copies, then
    /// persist changed accounts and the requested record in one unit.
    ///
    /// Returns [`LedgerRepositoryError::MissingAccount`] before `apply` runs
    /// when any id is unknown.
    async fn mutate_accounts<F>(&self, ids: &[AccountId], apply: F) -> MutationResult
    where
        F: FnOnce(&mut LockedAccounts) -> Result<LedgerWrite, Error> + Send;

    /// Fetch a transfer with its endorsement count.
    async fn find_transfer(
        &self,
        id: TransferId,
    ) -> Result<Option<Transfer>, LedgerRepositoryError>;

    /// Record an endorsement.
    ///
    /// Checks, in order: the transfer exists, the endorser exists, the pair
    /// is new. Uniqueness is enforced by the store itself.
    async fn insert_endorsement(
        &self,
        endorsement: NewEndorsement,
    ) -> Result<EndorsementReceipt, LedgerRepositoryError>;

    /// Top accounts by credits received.
    async fn leaderboard(
        &self,
        limit: LeaderboardLimit,
    ) -> Result<Vec<LeaderboardEntry>, LedgerRepositoryError>;
}
