//! Statement HTTP handler.
//!
//! - GET /clientes/{id}/extrato - Balance, limit and last ten transactions

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError, handlers::parse_account_id, models::statement::StatementResponse,
    services::ledger_service::LedgerService,
};

/// Get the statement of an account.
///
/// # Response (200)
///
/// ```json
/// {
///   "saldo": {
///     "total": -9098,
///     "data_extrato": "2024-01-17T02:34:41.217753Z",
///     "limite": 100000
///   },
///   "ultimas_transacoes": [
///     { "valor": 10, "tipo": "c", "descricao": "descricao", "realizada_em": "2024-01-17T02:34:38.543030Z" }
///   ]
/// }
/// ```
pub async fn get_statement(
    State(ledger): State<LedgerService>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatementResponse>, AppError> {
    let account_id = parse_account_id(&raw_id)?;
    let statement = ledger.statement(account_id).await?;

    Ok(Json(statement.into()))
}
