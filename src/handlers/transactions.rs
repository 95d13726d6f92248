//! Transaction HTTP handler.
//!
//! - POST /clientes/{id}/transacoes - Post a credit or debit

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    error::AppError,
    handlers::parse_account_id,
    models::{
        account::BalanceResponse,
        transaction::{NewTransaction, PostTransactionRequest},
    },
    services::ledger_service::LedgerService,
};

/// Post a transaction to an account.
///
/// # Request Body
///
/// ```json
/// {
///   "valor": 1000,
///   "tipo": "d",
///   "descricao": "padaria"
/// }
/// ```
///
/// # Response (200)
///
/// ```json
/// {
///   "limite": 100000,
///   "saldo": -1000
/// }
/// ```
///
/// # Errors
///
/// - **404**: unknown account
/// - **422**: malformed body, invalid fields, or not enough limit
pub async fn post_transaction(
    State(ledger): State<LedgerService>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PostTransactionRequest>, JsonRejection>,
) -> Result<Json<BalanceResponse>, AppError> {
    let account_id = parse_account_id(&raw_id)?;

    // Any decoding problem is reported as invalid input
    let Json(request) =
        payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let transaction = NewTransaction::try_from(request)?;

    let account = ledger.post_transaction(account_id, transaction).await?;

    Ok(Json(account.into()))
}
