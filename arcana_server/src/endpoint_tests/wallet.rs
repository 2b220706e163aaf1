//! Full-stack endpoint tests for the wallet routes, backed by a throwaway SQLite database.

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use arcana_engine::{
    db_types::DeliveryContent,
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed,
    },
    AuthApi,
    LedgerApi,
    NewOrderRequest,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    endpoint_tests::helpers::{get_request, post_request},
    routes::{my_wallet, request_withdrawal, wallet_transactions},
};

async fn test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(LedgerApi::new(db.clone())))
            .app_data(web::Data::new(AuthApi::new(db)))
            .route("/api/wallet", web::get().to(my_wallet::<SqliteDatabase>))
            .route("/api/wallet/transactions", web::get().to(wallet_transactions::<SqliteDatabase>))
            .route("/api/wallet/withdrawals", web::post().to(request_withdrawal::<SqliteDatabase>));
    }
}

/// Runs a full order through to completion so the reader has R$85.00 available.
async fn fund_reader(db: &SqliteDatabase) {
    let client = seed::seed_client(db, "cli_alice").await;
    let reader = seed::seed_reader(db, "rdr_bruna").await;
    seed::seed_gig(db, "gig_spread", "rdr_bruna", 10_000).await;
    let api = OrderFlowApi::new(db.clone());
    let request = NewOrderRequest {
        gig_id: "gig_spread".to_string(),
        selected_addons: Vec::new(),
        requirements_answers: serde_json::Value::Null,
    };
    let order = api.place_order(&client, request).await.unwrap();
    api.attach_payment_id(&order.id, "pix_char_001").await.unwrap();
    api.settle_by_payment_id("pix_char_001").await.unwrap();
    let content = DeliveryContent::Digital {
        cards: vec!["Ace of Pentacles".to_string()],
        interpretation: "Prosperidade à vista.".to_string(),
    };
    api.deliver_order(&reader, &order.id, content).await.unwrap();
    api.complete_order(&client, &order.id).await.unwrap();
}

#[actix_web::test]
async fn an_empty_wallet_reads_as_zero() {
    let db = test_db().await;
    seed::seed_reader(&db, "rdr_bruna").await;
    let token = seed::seed_session(&db, "rdr_bruna").await;

    let (status, body) = get_request(&token, "/api/wallet", configure(db.clone())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"totalEarnings":0,"pendingBalance":0,"availableBalance":0}"#);

    let (status, body) = get_request(&token, "/api/wallet/transactions", configure(db)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn balances_and_ledger_after_a_sale() {
    let db = test_db().await;
    fund_reader(&db).await;
    let token = seed::seed_session(&db, "rdr_bruna").await;

    let (status, body) = get_request(&token, "/api/wallet", configure(db.clone())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"totalEarnings":8500,"pendingBalance":0,"availableBalance":8500}"#);

    let (status, body) = get_request(&token, "/api/wallet/transactions", configure(db)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let entries: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["entry_type"], "SaleCredit");
    assert_eq!(entries[0]["amount"], 8500);
}

#[actix_web::test]
async fn withdrawals_over_http() {
    let db = test_db().await;
    fund_reader(&db).await;
    let token = seed::seed_session(&db, "rdr_bruna").await;

    // Too much.
    let (status, body) = post_request(
        &token,
        "/api/wallet/withdrawals",
        serde_json::json!({"amount": 9_000}),
        configure(db.clone()),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Saldo disponível insuficiente"), "got {body}");

    // Just right.
    let (status, body) = post_request(
        &token,
        "/api/wallet/withdrawals",
        serde_json::json!({"amount": 5_000}),
        configure(db.clone()),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    let entry: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(entry["entry_type"], "Withdrawal");
    assert_eq!(entry["status"], "Pending");
    assert_eq!(entry["amount"], -5_000);

    let (status, body) = get_request(&token, "/api/wallet", configure(db)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"totalEarnings":8500,"pendingBalance":0,"availableBalance":3500}"#);
}

#[actix_web::test]
async fn clients_without_a_pix_key_cannot_withdraw() {
    let db = test_db().await;
    seed::seed_client(&db, "cli_alice").await;
    let token = seed::seed_session(&db, "cli_alice").await;
    let (status, body) =
        post_request(&token, "/api/wallet/withdrawals", serde_json::json!({"amount": 100}), configure(db))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Cadastre uma chave PIX"), "got {body}");
}
