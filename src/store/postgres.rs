//! PostgreSQL-backed account store.
//!
//! # Atomicity Guarantees
//!
//! A unit of work is one PostgreSQL transaction. The account row is locked
//! with `FOR UPDATE`, so a second writer on the same account waits until the
//! first commits or rolls back. If the unit is dropped before `commit`,
//! `sqlx` rolls the transaction back when the connection returns to the pool.

use async_trait::async_trait;
use sqlx::Postgres;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{AccountBalance, AccountId},
        transaction::{NewTransaction, Transaction},
    },
    store::{AccountStore, UnitOfWork},
};

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: DbPool,
}

impl PgAccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;

        Ok(Box::new(PgUnitOfWork { tx, locked: None }))
    }

    async fn read_unlocked(&self, account_id: AccountId) -> Result<AccountBalance, AppError> {
        sqlx::query_as::<_, AccountBalance>(
            "SELECT balance, credit_limit FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::AccountNotFound)
    }

    async fn recent_transactions(
        &self,
        account_id: AccountId,
        limit: usize,
    ) -> Result<Vec<Transaction>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, account_id, amount, kind, description, created_at
            FROM transactions
            WHERE account_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A unit of work backed by one database transaction.
pub struct PgUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
    locked: Option<AccountId>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_and_read(&mut self, account_id: AccountId) -> Result<AccountBalance, AppError> {
        // FOR UPDATE holds the row lock until commit/rollback
        let account = sqlx::query_as::<_, AccountBalance>(
            "SELECT balance, credit_limit FROM accounts WHERE id = $1 FOR UPDATE",
        )
        .bind(account_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or(AppError::AccountNotFound)?;

        self.locked = Some(account_id);
        Ok(account)
    }

    async fn apply_delta(&mut self, account_id: AccountId, delta: i64) -> Result<i64, AppError> {
        if self.locked != Some(account_id) {
            return Err(AppError::Storage(format!(
                "account {account_id} updated without holding its lock"
            )));
        }

        let balance: i64 = sqlx::query_scalar(
            "UPDATE accounts SET balance = balance + $1 WHERE id = $2 RETURNING balance",
        )
        .bind(delta)
        .bind(account_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(balance)
    }

    async fn append_transaction(
        &mut self,
        account_id: AccountId,
        transaction: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (account_id, amount, kind, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, amount, kind, description, created_at
            "#,
        )
        .bind(account_id)
        .bind(transaction.amount)
        .bind(transaction.kind.code())
        .bind(&transaction.description)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(transaction)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
