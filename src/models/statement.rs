//! Statement snapshot and its API response shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    account::AccountBalance,
    transaction::{Transaction, TransactionKind},
};

/// Number of transactions included in a statement.
pub const STATEMENT_LENGTH: usize = 10;

/// Read-only snapshot of an account.
///
/// The balance and the transaction list are read separately and may
/// reflect slightly different instants.
#[derive(Debug, Clone)]
pub struct Statement {
    pub account: AccountBalance,
    pub generated_at: DateTime<Utc>,
    /// At most `STATEMENT_LENGTH` entries, newest first
    pub transactions: Vec<Transaction>,
}

/// Response body for the statement endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "saldo": {
///     "total": -9098,
///     "data_extrato": "2024-01-17T02:34:41.217753Z",
///     "limite": 100000
///   },
///   "ultimas_transacoes": [
///     {
///       "valor": 10,
///       "tipo": "c",
///       "descricao": "descricao",
///       "realizada_em": "2024-01-17T02:34:38.543030Z"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct StatementResponse {
    #[serde(rename = "saldo")]
    pub summary: StatementSummary,

    #[serde(rename = "ultimas_transacoes")]
    pub transactions: Vec<StatementEntry>,
}

#[derive(Debug, Serialize)]
pub struct StatementSummary {
    #[serde(rename = "total")]
    pub balance: i64,

    #[serde(rename = "data_extrato")]
    pub generated_at: DateTime<Utc>,

    #[serde(rename = "limite")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct StatementEntry {
    #[serde(rename = "valor")]
    pub amount: i64,

    #[serde(rename = "tipo")]
    pub kind: TransactionKind,

    #[serde(rename = "descricao")]
    pub description: String,

    #[serde(rename = "realizada_em")]
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for StatementEntry {
    fn from(transaction: Transaction) -> Self {
        Self {
            amount: transaction.amount,
            kind: transaction.kind,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            summary: StatementSummary {
                balance: statement.account.balance,
                generated_at: statement.generated_at,
                limit: statement.account.limit,
            },
            transactions: statement.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let now = Utc::now();
        let statement = Statement {
            account: AccountBalance::new(-500, 1000),
            generated_at: now,
            transactions: vec![Transaction {
                id: 7,
                account_id: 1,
                amount: 500,
                kind: TransactionKind::Credit,
                description: "deposito".to_string(),
                created_at: now,
            }],
        };

        let body = serde_json::to_value(StatementResponse::from(statement)).unwrap();

        assert_eq!(body["saldo"]["total"], -500);
        assert_eq!(body["saldo"]["limite"], 1000);
        assert!(body["saldo"]["data_extrato"].is_string());
        assert_eq!(body["ultimas_transacoes"][0]["valor"], 500);
        assert_eq!(body["ultimas_transacoes"][0]["tipo"], "c");
        assert_eq!(body["ultimas_transacoes"][0]["descricao"], "deposito");
        assert!(body["ultimas_transacoes"][0].get("id").is_none());
    }
}
