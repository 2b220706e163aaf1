use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use abacate_tools::AbacateApi;
use arcana_engine::{AuthApi, LedgerApi, OrderFlowApi, SqliteDatabase};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        cancel_order,
        checkout,
        complete_order,
        deliver_order,
        health,
        my_orders,
        my_wallet,
        order_by_id,
        order_status,
        request_withdrawal,
        wallet_transactions,
    },
    webhook_routes::abacate_webhook,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let abacate_api =
        AbacateApi::new(config.abacate.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let ledger_api = LedgerApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("arc::access_log"))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(ledger_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(abacate_api.clone()));
        // Routes that require a session token
        let api_scope = web::scope("/api")
            .route("/checkout", web::post().to(checkout::<SqliteDatabase>))
            .route("/orders", web::get().to(my_orders::<SqliteDatabase>))
            .route("/order/{id}", web::get().to(order_by_id::<SqliteDatabase>))
            .route("/order/{id}/status", web::get().to(order_status::<SqliteDatabase>))
            .route("/order/{id}/deliver", web::post().to(deliver_order::<SqliteDatabase>))
            .route("/order/{id}/complete", web::post().to(complete_order::<SqliteDatabase>))
            .route("/order/{id}/cancel", web::post().to(cancel_order::<SqliteDatabase>))
            .route("/wallet", web::get().to(my_wallet::<SqliteDatabase>))
            .route("/wallet/transactions", web::get().to(wallet_transactions::<SqliteDatabase>))
            .route("/wallet/withdrawals", web::post().to(request_withdrawal::<SqliteDatabase>));
        // Webhooks authenticate with a shared secret instead of a session
        let webhook_scope =
            web::scope("/webhooks").route("/abacate", web::post().to(abacate_webhook::<SqliteDatabase>));
        app.service(health).service(api_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(std::time::Duration::from_secs(600)))
    .bind((host.as_str(), port))?;
    info!("🚀️ Server bound to {host}:{port}");
    Ok(srv.run())
}
