//! Full-stack endpoint tests for the order routes, backed by a throwaway SQLite database.

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use arcana_engine::{
    db_types::OrderStatus,
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed,
    },
    AuthApi,
    NewOrderRequest,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    endpoint_tests::helpers::{get_request, post_request},
    routes::{complete_order, deliver_order, my_orders, order_by_id},
};

async fn test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(db.clone())))
            .app_data(web::Data::new(AuthApi::new(db)))
            .route("/api/orders", web::get().to(my_orders::<SqliteDatabase>))
            .route("/api/order/{id}", web::get().to(order_by_id::<SqliteDatabase>))
            .route("/api/order/{id}/deliver", web::post().to(deliver_order::<SqliteDatabase>))
            .route("/api/order/{id}/complete", web::post().to(complete_order::<SqliteDatabase>));
    }
}

/// Seeds the standard cast and one paid order, returning session tokens for everyone.
async fn seed_paid_order(db: &SqliteDatabase) -> (String, String, String, String) {
    let client = seed::seed_client(db, "cli_alice").await;
    seed::seed_reader(db, "rdr_bruna").await;
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
    let client_token = seed::seed_session(db, "cli_alice").await;
    let reader_token = seed::seed_session(db, "rdr_bruna").await;
    (order.id.to_string(), client_token, reader_token, order.client_id)
}

#[actix_web::test]
async fn orders_require_a_session() {
    let db = test_db().await;
    let (status, _) = get_request("", "/api/orders", configure(db.clone())).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get_request("sess_bogus", "/api/orders", configure(db)).await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Sessão inválida"), "got {body}");
}

#[actix_web::test]
async fn orders_are_scoped_to_their_parties() {
    let db = test_db().await;
    let (order_id, client_token, reader_token, _) = seed_paid_order(&db).await;

    // Both parties see the order in their lists.
    let (status, body) = get_request(&client_token, "/api/orders", configure(db.clone())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&order_id), "got {body}");
    let (status, body) = get_request(&reader_token, "/api/orders", configure(db.clone())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&order_id), "got {body}");

    // A stranger gets an empty list and a 403 on direct access.
    seed::seed_client(&db, "cli_mallory").await;
    let stranger_token = seed::seed_session(&db, "cli_mallory").await;
    let (status, body) = get_request(&stranger_token, "/api/orders", configure(db.clone())).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
    let (status, body) =
        get_request(&stranger_token, &format!("/api/order/{order_id}"), configure(db)).await.unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Você não tem acesso a este pedido."), "got {body}");
}

#[actix_web::test]
async fn delivery_and_completion_over_http() {
    let db = test_db().await;
    let (order_id, client_token, reader_token, _) = seed_paid_order(&db).await;
    let content = serde_json::json!({
        "mode": "digital",
        "cards": ["The Magician", "Two of Cups", "The World"],
        "interpretation": "Começo auspicioso."
    });

    // The client cannot deliver.
    let (status, _) = post_request(
        &client_token,
        &format!("/api/order/{order_id}/deliver"),
        content.clone(),
        configure(db.clone()),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        post_request(&reader_token, &format!("/api/order/{order_id}/deliver"), content, configure(db.clone()))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::OK);
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], serde_json::to_value(OrderStatus::Delivered).unwrap());
    assert_eq!(order["delivery_content"]["mode"], "digital");

    // The reader cannot complete; the client can.
    let (status, _) = post_request(
        &reader_token,
        &format!("/api/order/{order_id}/complete"),
        serde_json::Value::Null,
        configure(db.clone()),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = post_request(
        &client_token,
        &format!("/api/order/{order_id}/complete"),
        serde_json::Value::Null,
        configure(db),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    let order: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], serde_json::to_value(OrderStatus::Completed).unwrap());
}

#[actix_web::test]
async fn malformed_delivery_payloads_are_rejected() {
    let db = test_db().await;
    let (order_id, _, reader_token, _) = seed_paid_order(&db).await;
    // Claiming physical mode with digital fields must not parse.
    let content = serde_json::json!({ "mode": "physical", "cards": ["The Fool"] });
    let (status, _) =
        post_request(&reader_token, &format!("/api/order/{order_id}/deliver"), content, configure(db)).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
