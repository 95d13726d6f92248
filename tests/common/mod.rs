//! Shared helpers for HTTP integration tests.

#![allow(dead_code)] // Not every test file uses every helper

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt;

use bounded_ledger::{
    models::account::AccountBalance, routes::create_router,
    services::ledger_service::LedgerService, store::memory::MemoryAccountStore,
};

/// Router over a fresh in-memory store holding the reference accounts.
pub fn reference_app() -> Router {
    let store = MemoryAccountStore::with_reference_accounts();
    create_router(LedgerService::new(Arc::new(store)))
}

/// Router over a fresh in-memory store holding one account with id 1.
pub fn app_with_account(balance: i64, limit: i64) -> Router {
    let store = MemoryAccountStore::new([(1, AccountBalance::new(balance, limit))]);
    create_router(LedgerService::new(Arc::new(store)))
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

pub fn transaction_body(amount: i64, kind: &str, description: &str) -> String {
    serde_json::json!({ "valor": amount, "tipo": kind, "descricao": description }).to_string()
}
