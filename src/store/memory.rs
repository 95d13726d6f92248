//! In-process account store.
//!
//! Each account carries a `tokio::sync::Mutex` that plays the role of the
//! row lock: a unit of work holds the owned guard from `lock_and_read` until
//! it commits, rolls back or is dropped. Writes are staged inside the unit
//! and published on commit, so an aborted unit leaves no trace.
//!
//! The published balance is an atomic, which lets `read_unlocked` answer
//! without touching the account mutex.

use std::{
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    error::AppError,
    models::{
        account::{AccountBalance, AccountId},
        transaction::{NewTransaction, Transaction},
    },
    store::{AccountStore, UnitOfWork},
};

/// Accounts provisioned in the reference deployment, as `(id, limit)`.
pub const REFERENCE_ACCOUNTS: [(AccountId, i64); 5] = [
    (1, 100_000),
    (2, 80_000),
    (3, 1_000_000),
    (4, 10_000_000),
    (5, 500_000),
];

struct MemoryAccount {
    limit: i64,
    balance: AtomicI64,
    lock: Arc<Mutex<()>>,
    log: RwLock<Vec<Transaction>>,
}

struct Inner {
    accounts: HashMap<AccountId, Arc<MemoryAccount>>,
    next_transaction_id: AtomicI64,
}

impl Inner {
    fn account(&self, account_id: AccountId) -> Result<&Arc<MemoryAccount>, AppError> {
        self.accounts
            .get(&account_id)
            .ok_or(AppError::AccountNotFound)
    }
}

/// Account store kept entirely in memory.
///
/// Cloning is cheap and every clone shares the same accounts.
#[derive(Clone)]
pub struct MemoryAccountStore {
    inner: Arc<Inner>,
}

impl MemoryAccountStore {
    /// Create a store holding the given accounts.
    pub fn new(accounts: impl IntoIterator<Item = (AccountId, AccountBalance)>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|(id, account)| {
                let account = MemoryAccount {
                    limit: account.limit,
                    balance: AtomicI64::new(account.balance),
                    lock: Arc::new(Mutex::new(())),
                    log: RwLock::new(Vec::new()),
                };
                (id, Arc::new(account))
            })
            .collect();

        Self {
            inner: Arc::new(Inner {
                accounts,
                next_transaction_id: AtomicI64::new(1),
            }),
        }
    }

    /// Store seeded with the reference accounts, all with a zero balance.
    pub fn with_reference_accounts() -> Self {
        Self::new(
            REFERENCE_ACCOUNTS
                .iter()
                .map(|&(id, limit)| (id, AccountBalance::new(0, limit))),
        )
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        Ok(Box::new(MemoryUnitOfWork {
            inner: Arc::clone(&self.inner),
            held: HashMap::new(),
        }))
    }

    async fn read_unlocked(&self, account_id: AccountId) -> Result<AccountBalance, AppError> {
        let account = self.inner.account(account_id)?;

        Ok(AccountBalance::new(
            account.balance.load(Ordering::Acquire),
            account.limit,
        ))
    }

    async fn recent_transactions(
        &self,
        account_id: AccountId,
        limit: usize,
    ) -> Result<Vec<Transaction>, AppError> {
        let account = self.inner.account(account_id)?;
        let log = account
            .log
            .read()
            .map_err(|_| AppError::Storage("transaction log lock poisoned".to_string()))?;

        Ok(log.iter().rev().take(limit).cloned().collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Account locked by a unit of work, with its staged writes.
struct HeldAccount {
    account: Arc<MemoryAccount>,
    _guard: OwnedMutexGuard<()>,
    balance: i64,
    appended: Vec<Transaction>,
}

pub struct MemoryUnitOfWork {
    inner: Arc<Inner>,
    held: HashMap<AccountId, HeldAccount>,
}

impl MemoryUnitOfWork {
    fn held_mut(&mut self, account_id: AccountId) -> Result<&mut HeldAccount, AppError> {
        self.held.get_mut(&account_id).ok_or_else(|| {
            AppError::Storage(format!(
                "account {account_id} written without holding its lock"
            ))
        })
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_and_read(&mut self, account_id: AccountId) -> Result<AccountBalance, AppError> {
        // Re-reading an account this unit already holds sees the staged state
        if let Some(held) = self.held.get(&account_id) {
            return Ok(AccountBalance::new(held.balance, held.account.limit));
        }

        let account = Arc::clone(self.inner.account(account_id)?);
        let guard = Arc::clone(&account.lock).lock_owned().await;
        let balance = account.balance.load(Ordering::Acquire);
        let limit = account.limit;

        self.held.insert(
            account_id,
            HeldAccount {
                account,
                _guard: guard,
                balance,
                appended: Vec::new(),
            },
        );

        Ok(AccountBalance::new(balance, limit))
    }

    async fn apply_delta(&mut self, account_id: AccountId, delta: i64) -> Result<i64, AppError> {
        let held = self.held_mut(account_id)?;

        let balance = held
            .balance
            .checked_add(delta)
            .ok_or_else(|| AppError::Storage(format!("balance overflow on account {account_id}")))?;

        // Same guarantee as the CHECK constraint on the accounts table
        if balance < -held.account.limit {
            return Err(AppError::Storage(format!(
                "balance of account {account_id} would fall below its limit"
            )));
        }

        held.balance = balance;
        Ok(balance)
    }

    async fn append_transaction(
        &mut self,
        account_id: AccountId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let id = self.inner.next_transaction_id.fetch_add(1, Ordering::Relaxed);
        let held = self.held_mut(account_id)?;

        let record = Transaction {
            id,
            account_id,
            amount: transaction.amount,
            kind: transaction.kind,
            description: transaction.description.clone(),
            created_at: Utc::now(),
        };
        held.appended.push(record.clone());

        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        for held in self.held.into_values() {
            {
                let mut log = held.account.log.write().map_err(|_| {
                    AppError::Storage("transaction log lock poisoned".to_string())
                })?;
                log.extend(held.appended);
            }
            held.account.balance.store(held.balance, Ordering::Release);
            // guard drops here, releasing the account
        }

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        // Staged writes and guards are dropped with self
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::transaction::TransactionKind;

    fn store() -> MemoryAccountStore {
        MemoryAccountStore::new([(1, AccountBalance::new(0, 1000)), (2, AccountBalance::new(50, 0))])
    }

    fn deposit(amount: i64) -> NewTransaction {
        NewTransaction::new(amount, TransactionKind::Credit, "deposit").unwrap()
    }

    #[tokio::test]
    async fn commit_publishes_balance_and_log() {
        let store = store();

        let mut unit = store.begin().await.unwrap();
        unit.lock_and_read(1).await.unwrap();
        assert_eq!(unit.apply_delta(1, 300).await.unwrap(), 300);
        unit.append_transaction(1, &deposit(300)).await.unwrap();

        // Not visible before commit
        assert_eq!(store.read_unlocked(1).await.unwrap().balance, 0);
        assert!(store.recent_transactions(1, 10).await.unwrap().is_empty());

        unit.commit().await.unwrap();

        assert_eq!(store.read_unlocked(1).await.unwrap(), AccountBalance::new(300, 1000));
        assert_eq!(store.recent_transactions(1, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dropped_unit_leaves_no_trace_and_releases_lock() {
        let store = store();

        {
            let mut unit = store.begin().await.unwrap();
            unit.lock_and_read(1).await.unwrap();
            unit.apply_delta(1, -400).await.unwrap();
            unit.append_transaction(1, &deposit(400)).await.unwrap();
        }

        assert_eq!(store.read_unlocked(1).await.unwrap().balance, 0);
        assert!(store.recent_transactions(1, 10).await.unwrap().is_empty());

        let mut unit = store.begin().await.unwrap();
        let locked = tokio::time::timeout(Duration::from_secs(1), unit.lock_and_read(1)).await;
        assert!(locked.is_ok(), "lock was not released by the dropped unit");
    }

    #[tokio::test]
    async fn second_locker_waits_for_the_first() {
        let store = store();

        let mut first = store.begin().await.unwrap();
        first.lock_and_read(1).await.unwrap();

        let mut second = store.begin().await.unwrap();
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), second.lock_and_read(1)).await;
        assert!(blocked.is_err(), "second unit acquired a held lock");

        first.apply_delta(1, 10).await.unwrap();
        first.commit().await.unwrap();

        let observed = second.lock_and_read(1).await.unwrap();
        assert_eq!(observed.balance, 10);
    }

    #[tokio::test]
    async fn other_accounts_are_not_blocked() {
        let store = store();

        let mut first = store.begin().await.unwrap();
        first.lock_and_read(1).await.unwrap();

        let mut second = store.begin().await.unwrap();
        let locked =
            tokio::time::timeout(Duration::from_millis(50), second.lock_and_read(2)).await;
        assert!(locked.is_ok());
    }

    #[tokio::test]
    async fn unlocked_read_does_not_wait_for_writer() {
        let store = store();

        let mut unit = store.begin().await.unwrap();
        unit.lock_and_read(1).await.unwrap();
        unit.apply_delta(1, 99).await.unwrap();

        let read = tokio::time::timeout(Duration::from_millis(50), store.read_unlocked(1)).await;
        assert_eq!(read.unwrap().unwrap().balance, 0);
    }

    #[tokio::test]
    async fn apply_delta_requires_the_lock() {
        let store = store();
        let mut unit = store.begin().await.unwrap();

        let err = unit.apply_delta(1, 5).await.unwrap_err();
        assert!(err.is_storage_failure());

        let err = unit.append_transaction(1, &deposit(5)).await.unwrap_err();
        assert!(err.is_storage_failure());
    }

    #[tokio::test]
    async fn apply_delta_refuses_to_break_the_bound() {
        let store = store();
        let mut unit = store.begin().await.unwrap();
        unit.lock_and_read(2).await.unwrap();

        assert!(unit.apply_delta(2, -51).await.unwrap_err().is_storage_failure());
        assert_eq!(unit.apply_delta(2, -50).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let store = store();
        let mut unit = store.begin().await.unwrap();

        assert!(matches!(unit.lock_and_read(42).await, Err(AppError::AccountNotFound)));
        assert!(matches!(store.read_unlocked(42).await, Err(AppError::AccountNotFound)));
        assert!(matches!(
            store.recent_transactions(42, 10).await,
            Err(AppError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn relocking_in_the_same_unit_sees_staged_balance() {
        let store = store();
        let mut unit = store.begin().await.unwrap();

        unit.lock_and_read(1).await.unwrap();
        unit.apply_delta(1, -20).await.unwrap();

        assert_eq!(unit.lock_and_read(1).await.unwrap().balance, -20);
    }

    #[tokio::test]
    async fn reference_accounts_start_at_zero() {
        let store = MemoryAccountStore::with_reference_accounts();

        for (id, limit) in REFERENCE_ACCOUNTS {
            assert_eq!(store.read_unlocked(id).await.unwrap(), AccountBalance::new(0, limit));
        }
        assert!(store.read_unlocked(6).await.is_err());
    }
}
