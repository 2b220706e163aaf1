use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use arcana_common::Cents;
use arcana_engine::db_types::{Json, Order, OrderId, OrderStatus};
use chrono::Utc;

use crate::auth::SESSION_TOKEN_HEADER;

pub async fn get_request<F>(token: &str, path: &str, configure: F) -> anyhow::Result<(StatusCode, String)>
where F: FnOnce(&mut ServiceConfig) {
    let mut req = TestRequest::get().uri(path);
    if !token.is_empty() {
        req = req.insert_header((SESSION_TOKEN_HEADER, token));
    }
    send(req, configure).await
}

pub async fn post_request<F>(
    token: &str,
    path: &str,
    body: serde_json::Value,
    configure: F,
) -> anyhow::Result<(StatusCode, String)>
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut req = TestRequest::post().uri(path).set_json(body);
    if !token.is_empty() {
        req = req.insert_header((SESSION_TOKEN_HEADER, token));
    }
    send(req, configure).await
}

async fn send<F>(req: TestRequest, configure: F) -> anyhow::Result<(StatusCode, String)>
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init().ok();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    // Handler errors come back as `Err` here rather than as rendered responses, so render them
    // the way the HTTP server would.
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.into_parts().1,
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let body = res.into_body().try_into_bytes().map_err(|_| anyhow::anyhow!("Could not read response body"))?;
    Ok((status, String::from_utf8_lossy(&body).into_owned()))
}

/// A paid order fixture for tests that never touch a real database.
pub fn sample_order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: OrderId::from(id),
        client_id: "cli_alice".to_string(),
        reader_id: "rdr_bruna".to_string(),
        gig_id: "gig_spread".to_string(),
        status,
        amount_total: Cents::from(10_000),
        amount_platform_fee: Cents::from(1_500),
        amount_reader_net: Cents::from(8_500),
        selected_addons: Json(Vec::new()),
        requirements_answers: Json(serde_json::Value::Null),
        delivery_content: None,
        external_payment_id: Some("pix_char_123456".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
