use actix_web::{http::StatusCode, web, web::ServiceConfig};
use arcana_common::{Cents, Secret};
use arcana_engine::{
    db_types::{EntryStatus, EntryType, LedgerEntry, OrderStatus, SettlementOutcome},
    OrderFlowApi,
};
use chrono::Utc;

use crate::{
    config::ServerConfig,
    endpoint_tests::{
        helpers::{post_request, sample_order},
        mocks::MockOrderManager,
    },
    webhook_routes::abacate_webhook,
};

const SECRET: &str = "whsec_test_0001";

fn test_config(secret: &str) -> ServerConfig {
    ServerConfig { webhook_secret: Secret::new(secret.to_string()), ..ServerConfig::default() }
}

fn configure(mock: MockOrderManager, config: ServerConfig) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(mock)))
            .app_data(web::Data::new(config))
            .route("/webhooks/abacate", web::post().to(abacate_webhook::<MockOrderManager>));
    }
}

fn paid_event(payment_id: &str) -> serde_json::Value {
    serde_json::json!({
        "event": "billing.paid",
        "data": { "id": payment_id, "status": "PAID" }
    })
}

fn sample_credit() -> LedgerEntry {
    LedgerEntry {
        id: "txn_test0001".to_string(),
        wallet_id: "wal_test0001".to_string(),
        amount: Cents::from(8_500),
        entry_type: EntryType::SaleCredit,
        status: EntryStatus::Pending,
        order_id: Some("ord_0001".into()),
        external_id: None,
        created_at: Utc::now(),
    }
}

#[actix_web::test]
async fn unconfigured_secret_is_a_server_error() {
    let mock = MockOrderManager::new();
    let (status, _) = post_request(
        "",
        &format!("/webhooks/abacate?webhookSecret={SECRET}"),
        paid_event("pix_char_123456"),
        configure(mock, test_config("")),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn bad_secret_is_rejected() {
    let mock = MockOrderManager::new();
    let (status, _) = post_request(
        "",
        "/webhooks/abacate?webhookSecret=wrong",
        paid_event("pix_char_123456"),
        configure(mock, test_config(SECRET)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mock = MockOrderManager::new();
    let (status, _) =
        post_request("", "/webhooks/abacate", paid_event("pix_char_123456"), configure(mock, test_config(SECRET)))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn paid_event_settles_the_order() {
    let mut mock = MockOrderManager::new();
    let pending = sample_order("ord_0001", OrderStatus::PendingPayment);
    mock.expect_fetch_order_by_payment_id()
        .withf(|id| id == "pix_char_123456")
        .returning(move |_| Ok(Some(pending.clone())));
    mock.expect_settle_order().returning(move |_| {
        Ok(SettlementOutcome::Settled { order: sample_order("ord_0001", OrderStatus::Paid), credit: sample_credit() })
    });
    let (status, body) = post_request(
        "",
        &format!("/webhooks/abacate?webhookSecret={SECRET}"),
        paid_event("pix_char_123456"),
        configure(mock, test_config(SECRET)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order settled."), "got {body}");
}

#[actix_web::test]
async fn duplicate_events_are_absorbed() {
    let mut mock = MockOrderManager::new();
    let paid = sample_order("ord_0001", OrderStatus::Paid);
    mock.expect_fetch_order_by_payment_id().returning(move |_| Ok(Some(paid.clone())));
    mock.expect_settle_order()
        .returning(move |_| Ok(SettlementOutcome::AlreadySettled(sample_order("ord_0001", OrderStatus::Paid))));
    let (status, body) = post_request(
        "",
        &format!("/webhooks/abacate?webhookSecret={SECRET}"),
        paid_event("pix_char_123456"),
        configure(mock, test_config(SECRET)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("already settled"), "got {body}");
}

#[actix_web::test]
async fn non_paid_events_are_ignored() {
    // No expectations on the mock: touching the database at all would fail the test.
    let mock = MockOrderManager::new();
    let event = serde_json::json!({
        "event": "billing.expired",
        "data": { "id": "pix_char_123456", "status": "EXPIRED" }
    });
    let (status, body) =
        post_request("", &format!("/webhooks/abacate?webhookSecret={SECRET}"), event, configure(mock, test_config(SECRET)))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Event ignored."), "got {body}");
}

#[actix_web::test]
async fn unknown_payments_still_answer_200() {
    let mut mock = MockOrderManager::new();
    mock.expect_fetch_order_by_payment_id().returning(|_| Ok(None));
    let (status, body) = post_request(
        "",
        &format!("/webhooks/abacate?webhookSecret={SECRET}"),
        paid_event("pix_char_unknown"),
        configure(mock, test_config(SECRET)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Unknown payment."), "got {body}");
}

#[actix_web::test]
async fn metadata_order_id_is_the_fallback() {
    let mut mock = MockOrderManager::new();
    mock.expect_fetch_order_by_payment_id().returning(|_| Ok(None));
    mock.expect_settle_order().withf(|id| id.as_str() == "ord_0001").returning(move |_| {
        Ok(SettlementOutcome::Settled { order: sample_order("ord_0001", OrderStatus::Paid), credit: sample_credit() })
    });
    let event = serde_json::json!({
        "event": "pixQrCode.paid",
        "data": { "id": "pix_char_elsewhere", "status": "PAID", "metadata": { "orderId": "ord_0001" } }
    });
    let (status, body) =
        post_request("", &format!("/webhooks/abacate?webhookSecret={SECRET}"), event, configure(mock, test_config(SECRET)))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order settled."), "got {body}");
}
