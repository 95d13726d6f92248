//! Ledger service - Core business logic for posting transactions.
//!
//! This service handles:
//! - Overdraft bound enforcement (`balance >= -limit`)
//! - Atomic balance update plus transaction append
//! - Statement queries (balance, limit, last ten transactions)
//!
//! # Atomicity Guarantees
//!
//! Every post runs inside one unit of work of the account store. The
//! account is locked before its balance is read, so two posts on the same
//! account are serialized and the bound check cannot race. Any failure
//! rolls the unit back; there are no retries.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        account::{AccountBalance, AccountId},
        statement::{STATEMENT_LENGTH, Statement},
        transaction::NewTransaction,
    },
    store::{AccountStore, UnitOfWork},
};

/// Entry point of the ledger core, shared by all request handlers.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn AccountStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Post a credit or debit to an account.
    ///
    /// # Process
    ///
    /// 1. Validate the transaction
    /// 2. Open a unit of work and lock the account
    /// 3. Reject if the new balance would fall below `-limit`
    /// 4. Update balance and append the transaction record
    /// 5. Commit (or roll back on any error)
    ///
    /// # Returns
    ///
    /// Balance after the post, and the account limit
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: negative amount, description outside 1..=10 chars,
    ///   or a balance that would overflow
    /// - `AccountNotFound`: account doesn't exist
    /// - `OverdraftExceeded`: the post would break the overdraft bound
    /// - `Database` / `Storage`: the unit of work could not complete
    #[tracing::instrument(
        skip(self, transaction),
        fields(kind = %transaction.kind, amount = transaction.amount)
    )]
    pub async fn post_transaction(
        &self,
        account_id: AccountId,
        transaction: NewTransaction,
    ) -> Result<AccountBalance, AppError> {
        transaction.validate()?;

        let mut unit = self.store.begin().await?;

        let outcome = apply(unit.as_mut(), account_id, &transaction).await;
        match outcome {
            Ok(account) => {
                unit.commit().await?;
                tracing::info!(balance = account.balance, "transaction posted");
                Ok(account)
            }
            Err(err) => {
                // Report the first error; a failed rollback still releases
                // the lock when the unit is dropped
                if let Err(rollback_err) = unit.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                match &err {
                    AppError::OverdraftExceeded => {
                        tracing::warn!("transaction rejected: overdraft")
                    }
                    AppError::AccountNotFound => {
                        tracing::warn!("transaction rejected: unknown account")
                    }
                    _ => tracing::error!(error = %err, "transaction aborted"),
                }
                Err(err)
            }
        }
    }

    /// Build the statement of an account.
    ///
    /// Balance and transactions are read without locking and without a
    /// shared snapshot; the statement is advisory.
    #[tracing::instrument(skip(self))]
    pub async fn statement(&self, account_id: AccountId) -> Result<Statement, AppError> {
        let account = self.store.read_unlocked(account_id).await?;
        let transactions = self
            .store
            .recent_transactions(account_id, STATEMENT_LENGTH)
            .await?;

        Ok(Statement {
            account,
            generated_at: Utc::now(),
            transactions,
        })
    }

    /// Check storage connectivity.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

/// Locked read, bound check, write and append, all inside `unit`.
async fn apply(
    unit: &mut dyn UnitOfWork,
    account_id: AccountId,
    transaction: &NewTransaction,
) -> Result<AccountBalance, AppError> {
    let account = unit.lock_and_read(account_id).await?;

    let delta = transaction.delta();
    account.checked_apply(delta)?;

    let balance = unit.apply_delta(account_id, delta).await?;
    unit.append_transaction(account_id, transaction).await?;

    Ok(AccountBalance::new(balance, account.limit))
}
