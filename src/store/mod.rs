//! Account store: storage of `(balance, limit)` pairs and the transaction log.
//!
//! The ledger talks to storage only through these traits. A unit of work
//! is all-or-nothing: either `commit` makes the balance update and the
//! appended transaction visible together, or nothing changes. Dropping a
//! unit of work without committing (e.g. when the request future is
//! cancelled) aborts it and releases any account lock it holds.
//!
//! Implementations:
//! - [`postgres::PgAccountStore`]: `sqlx` transactions with `SELECT ... FOR UPDATE`
//! - [`memory::MemoryAccountStore`]: per-account async mutex, staged writes

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        account::{AccountBalance, AccountId},
        transaction::{NewTransaction, Transaction},
    },
};

pub mod memory;
pub mod postgres;

/// Handle to the account store, shared by all requests.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Open a new unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;

    /// Read balance and limit without taking the account lock.
    ///
    /// Never blocks on, and never blocks, an in-flight writer. The result
    /// may predate a commit that is about to happen.
    async fn read_unlocked(&self, account_id: AccountId) -> Result<AccountBalance, AppError>;

    /// Up to `limit` transactions of the account, newest first.
    async fn recent_transactions(
        &self,
        account_id: AccountId,
        limit: usize,
    ) -> Result<Vec<Transaction>, AppError>;

    /// Check that the storage backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// One open, atomic unit of work.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Take the exclusive lock on the account and read its state.
    ///
    /// Blocks while another unit of work holds the same account. The lock
    /// is held until this unit commits, rolls back or is dropped.
    async fn lock_and_read(&mut self, account_id: AccountId) -> Result<AccountBalance, AppError>;

    /// `balance := balance + delta`, returning the new balance.
    ///
    /// Fails with a storage error unless `lock_and_read` was called for the
    /// same account in this unit of work.
    async fn apply_delta(&mut self, account_id: AccountId, delta: i64) -> Result<i64, AppError>;

    /// Append a transaction record to the account's log.
    async fn append_transaction(
        &mut self,
        account_id: AccountId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, AppError>;

    /// Make every write of this unit visible and release its locks.
    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    /// Discard every write of this unit and release its locks.
    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}
