//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `TransactionKind`: credit or debit, encoded as `c` / `d`
//! - `NewTransaction`: a validated transaction about to be posted
//! - `Transaction`: an immutable, persisted transaction record
//! - `PostTransactionRequest`: request body for posting a transaction

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::account::AccountId};

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 10;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionKind {
    /// Adds money to the account
    #[serde(rename = "c")]
    Credit,

    /// Removes money from the account, possibly into the overdraft
    #[serde(rename = "d")]
    Debit,
}

impl TransactionKind {
    /// Wire and storage code.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "c",
            TransactionKind::Debit => "d",
        }
    }

    /// Signed balance change for a transaction of `amount` in this direction.
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown transaction kind: {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for TransactionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(TransactionKind::Credit),
            "d" => Ok(TransactionKind::Debit),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = UnknownKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UnknownKind> for AppError {
    fn from(err: UnknownKind) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Magnitude, never negative
    pub amount: i64,
    pub kind: TransactionKind,
    /// 1 to 10 characters
    pub description: String,
}

impl NewTransaction {
    /// Build and validate a new transaction.
    pub fn new(
        amount: i64,
        kind: TransactionKind,
        description: impl Into<String>,
    ) -> Result<Self, AppError> {
        let transaction = Self {
            amount,
            kind,
            description: description.into(),
        };
        transaction.validate()?;
        Ok(transaction)
    }

    /// Check amount and description bounds.
    ///
    /// # Rules
    ///
    /// - `amount >= 0`
    /// - description has 1 to 10 characters (Unicode scalar values, not bytes)
    pub fn validate(&self) -> Result<(), AppError> {
        if self.amount < 0 {
            return Err(AppError::InvalidInput(
                "Amount must not be negative".to_string(),
            ));
        }

        let len = self.description.chars().count();
        if len == 0 || len > MAX_DESCRIPTION_LEN {
            return Err(AppError::InvalidInput(format!(
                "Description must have between 1 and {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(())
    }

    /// Signed balance change this transaction applies.
    pub fn delta(&self) -> i64 {
        self.kind.signed(self.amount)
    }
}

/// Represents a transaction record.
///
/// # Database Table
///
/// Maps to the append-only `transactions` table. Rows are never updated or
/// deleted; `id` is a BIGSERIAL and defines creation order.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,

    /// Owning account
    pub account_id: AccountId,

    /// Magnitude of the transaction
    pub amount: i64,

    #[sqlx(try_from = "String")]
    pub kind: TransactionKind,

    pub description: String,

    /// Assigned when the row is persisted
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "valor": 1000,
///   "tipo": "c",
///   "descricao": "descricao"
/// }
/// ```
///
/// `tipo` is kept as a string so an unknown kind is reported as
/// `InvalidInput` by the ledger rather than as a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct PostTransactionRequest {
    /// Amount (integer, fractional values are rejected by the decoder)
    #[serde(rename = "valor")]
    pub amount: i64,

    /// `c` for credit, `d` for debit
    #[serde(rename = "tipo")]
    pub kind: String,

    #[serde(rename = "descricao")]
    pub description: String,
}

impl TryFrom<PostTransactionRequest> for NewTransaction {
    type Error = AppError;

    fn try_from(request: PostTransactionRequest) -> Result<Self, Self::Error> {
        let kind = request.kind.parse()?;
        NewTransaction::new(request.amount, kind, request.description)
    }
}
