//! Account data models and API response types.
//!
//! This module defines:
//! - `AccountId`: identity of a provisioned customer account
//! - `AccountBalance`: the `(balance, limit)` pair guarded by the account store
//! - `BalanceResponse`: response body returned after a successful post

use serde::Serialize;

use crate::error::AppError;

/// Identifier of a customer account.
///
/// Accounts are provisioned out of band (the reference deployment seeds
/// ids 1..5); the ledger never creates or deletes them.
pub type AccountId = i32;

/// Current balance and credit limit of one account.
///
/// # Invariant
///
/// `balance >= -limit` at all times. The ledger service checks the bound
/// before every write; the `accounts` table carries a CHECK constraint as a
/// second line of defence.
///
/// Amounts are integers in the smallest currency unit (no floats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct AccountBalance {
    /// Current balance, may be negative down to `-limit`
    pub balance: i64,

    /// Overdraft allowance, immutable after provisioning
    #[sqlx(rename = "credit_limit")]
    pub limit: i64,
}

impl AccountBalance {
    pub fn new(balance: i64, limit: i64) -> Self {
        Self { balance, limit }
    }

    /// Balance after applying `delta`.
    ///
    /// # Errors
    ///
    /// - `OverdraftExceeded`: the result would fall below `-limit`
    /// - `InvalidInput`: a credit would push the balance past `i64::MAX`
    pub fn checked_apply(&self, delta: i64) -> Result<i64, AppError> {
        let Some(next) = self.balance.checked_add(delta) else {
            // Underflow lies below any representable -limit
            return Err(if delta < 0 {
                AppError::OverdraftExceeded
            } else {
                AppError::InvalidInput("Amount overflows the account balance".to_string())
            });
        };

        if next < -self.limit {
            return Err(AppError::OverdraftExceeded);
        }
        Ok(next)
    }
}

/// Response body for a successful transaction post.
///
/// # JSON Example
///
/// ```json
/// {
///   "limite": 100000,
///   "saldo": -9098
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Credit limit
    #[serde(rename = "limite")]
    pub limit: i64,

    /// Balance after the transaction
    #[serde(rename = "saldo")]
    pub balance: i64,
}

impl From<AccountBalance> for BalanceResponse {
    fn from(account: AccountBalance) -> Self {
        Self {
            limit: account.limit,
            balance: account.balance,
        }
    }
}
