//! Router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, services::ledger_service::LedgerService};

/// Build the HTTP router.
///
/// # Routes
///
/// - `GET /health-check` - Liveness check
/// - `GET /health` - Storage connectivity check
/// - `POST /clientes/{id}/transacoes` - Post a credit or debit
/// - `GET /clientes/{id}/extrato` - Account statement
pub fn create_router(ledger: LedgerService) -> Router {
    Router::new()
        .route("/health-check", get(handlers::health::liveness))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/clientes/{id}/transacoes",
            post(handlers::transactions::post_transaction),
        )
        .route(
            "/clientes/{id}/extrato",
            get(handlers::statements::get_statement),
        )
        .layer(TraceLayer::new_for_http())
        // Ledger handle is shared with all handlers via State extraction
        .with_state(ledger)
}
