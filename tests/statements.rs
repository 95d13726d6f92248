//! Statement and health endpoint integration tests.

mod common;

use axum::http::StatusCode;

use common::{app_with_account, get_json, post_json, reference_app, transaction_body};

#[tokio::test]
async fn statement_lists_ten_newest_transactions() {
    let app = app_with_account(0, 1000);

    for amount in 1..=15 {
        let (status, _) = post_json(
            &app,
            "/clientes/1/transacoes",
            &transaction_body(amount, "c", &format!("t{amount}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_json(&app, "/clientes/1/extrato").await;
    assert_eq!(status, StatusCode::OK);

    let transactions = body["ultimas_transacoes"].as_array().unwrap();
    assert_eq!(transactions.len(), 10);
    assert_eq!(transactions[0]["descricao"], "t15");
    assert_eq!(transactions[9]["descricao"], "t6");
    assert_eq!(transactions[0]["tipo"], "c");
    assert!(transactions[0]["realizada_em"].is_string());

    assert_eq!(body["saldo"]["total"], 120);
    assert_eq!(body["saldo"]["limite"], 1000);
    assert!(body["saldo"]["data_extrato"].is_string());
}

#[tokio::test]
async fn statement_of_fresh_reference_account() {
    let app = reference_app();

    let (status, body) = get_json(&app, "/clientes/2/extrato").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saldo"]["total"], 0);
    assert_eq!(body["saldo"]["limite"], 80000);
    assert_eq!(body["ultimas_transacoes"], serde_json::json!([]));
}

#[tokio::test]
async fn statement_of_unknown_account_is_404() {
    let app = reference_app();

    let (status, _) = get_json(&app, "/clientes/0/extrato").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn credit_then_debit_restores_balance() {
    let app = app_with_account(-10, 1000);

    post_json(&app, "/clientes/1/transacoes", &transaction_body(300, "c", "in")).await;
    let (_, body) =
        post_json(&app, "/clientes/1/transacoes", &transaction_body(300, "d", "out")).await;
    assert_eq!(body["saldo"], -10);

    let (_, statement) = get_json(&app, "/clientes/1/extrato").await;
    let kinds: Vec<_> = statement["ultimas_transacoes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tipo"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["d", "c"]);
}

#[tokio::test]
async fn health_reports_connected_storage() {
    let app = reference_app();

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "connected");
}

#[tokio::test]
async fn liveness_answers_ok() {
    let app = reference_app();

    let (status, body) = get_json(&app, "/health-check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "message": "ok" }));
}
