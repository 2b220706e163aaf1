//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module
//! neat and tidy 🙏
//!
//! Handlers are generic over the storage backend so that endpoint tests can swap the database
//! for mocks. actix cannot infer generic handlers, so the concrete types are pinned when the
//! routes are registered in [`crate::server`].

use actix_web::{get, web, HttpResponse, Responder};
use abacate_tools::{AbacateApi, ChargeCustomer, ChargeProduct, ChargeStatus};
use arcana_engine::{
    db_types::{DeliveryContent, OrderId, OrderStatus},
    traits::{LedgerManagement, OrderManagement},
    LedgerApi,
    NewOrderRequest,
    OrderFlowApi,
};
use log::*;

use crate::{
    auth::AuthenticatedProfile,
    config::ServerConfig,
    data_objects::{
        CheckoutRequest,
        CheckoutResponse,
        OrderStatusResponse,
        PaymentInstructions,
        PaymentMethod,
        WithdrawalRequest,
    },
    errors::ServerError,
};

/// A simple health check route
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------

/// `POST /api/checkout`
///
/// Runs the order intake checks, creates the charge on AbacatePay and hands the payment
/// instructions back to the buyer. The charge id is recorded against the order before the
/// response goes out, so webhook and polling reconciliation can find the order again.
pub async fn checkout<B: OrderManagement>(
    buyer: AuthenticatedProfile,
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B>>,
    abacate: web::Data<AbacateApi>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    let method = request.payment_method;
    let order_request = NewOrderRequest {
        gig_id: request.gig_id,
        selected_addons: request.selected_addons,
        requirements_answers: request.requirements_answers,
    };
    let order = api.place_order(&buyer, order_request).await?;
    let customer = ChargeCustomer {
        name: buyer.display_name.clone(),
        email: buyer.email.clone(),
        cellphone: buyer.cellphone.clone().unwrap_or_default(),
        tax_id: buyer.tax_id.clone().unwrap_or_default(),
    };
    let payment = match method {
        PaymentMethod::PixQrCode => {
            let description = format!("Pedido {} - Tiragem de tarô", order.id);
            let qr = abacate
                .create_pix_qr_code(order.amount_total, description, customer)
                .await
                .map_err(|e| ServerError::PaymentGatewayError(e.to_string()))?;
            PaymentInstructions {
                payment_id: qr.id,
                checkout_url: None,
                br_code: Some(qr.br_code),
                br_code_base64: Some(qr.br_code_base64),
            }
        },
        PaymentMethod::HostedCheckout => {
            let products = vec![ChargeProduct {
                external_id: order.id.to_string(),
                name: "Tiragem de tarô".to_string(),
                quantity: 1,
                price: order.amount_total,
            }];
            let billing = abacate
                .create_billing(
                    products,
                    customer,
                    config.checkout_return_url.clone(),
                    config.checkout_completion_url.clone(),
                )
                .await
                .map_err(|e| ServerError::PaymentGatewayError(e.to_string()))?;
            PaymentInstructions {
                payment_id: billing.id,
                checkout_url: Some(billing.url),
                br_code: None,
                br_code_base64: None,
            }
        },
    };
    let order = api.attach_payment_id(&order.id, &payment.payment_id).await?;
    info!("💻️ Checkout for order {} ready. Payment {} pending.", order.id, payment.payment_id);
    Ok(HttpResponse::Ok().json(CheckoutResponse { order, payment }))
}

//----------------------------------------------    Orders   ----------------------------------------------------

/// `GET /api/order/{id}`
pub async fn order_by_id<B: OrderManagement>(
    caller: AuthenticatedProfile,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::new(path.into_inner());
    let order = api.fetch_order_for(&caller, &order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// `GET /api/order/{id}/status`
///
/// The polling half of payment reconciliation. If the order is still pending and a charge is
/// attached, the gateway is asked for the current charge status; a `PAID` answer settles the
/// order on the spot, exactly as the webhook would. Clients poll this endpoint while showing the
/// QR code.
pub async fn order_status<B: OrderManagement>(
    caller: AuthenticatedProfile,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
    abacate: web::Data<AbacateApi>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::new(path.into_inner());
    let order = api.fetch_order_for(&caller, &order_id).await?;
    let mut status = order.status;
    if let (OrderStatus::PendingPayment, Some(payment_id)) = (order.status, order.external_payment_id.as_deref()) {
        match abacate.check_pix_status(payment_id).await {
            Ok(ChargeStatus::Paid) => {
                let outcome = api.settle_order(&order.id).await?;
                status = outcome.order().status;
            },
            Ok(other) => trace!("💻️ Charge {payment_id} still {other}"),
            // A flaky gateway must not break polling; report the stored status.
            Err(e) => warn!("🥑️ Could not poll charge {payment_id}: {e}"),
        }
    }
    Ok(HttpResponse::Ok().json(OrderStatusResponse { order_id: order.id.to_string(), status }))
}

/// `GET /api/orders`: all orders the caller participates in, as client or reader.
pub async fn my_orders<B: OrderManagement>(
    caller: AuthenticatedProfile,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let orders = api.orders_for_profile(&caller).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// `POST /api/order/{id}/deliver`: the reader hands over the reading.
pub async fn deliver_order<B: OrderManagement>(
    caller: AuthenticatedProfile,
    path: web::Path<String>,
    body: web::Json<DeliveryContent>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::new(path.into_inner());
    let order = api.deliver_order(&caller, &order_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// `POST /api/order/{id}/complete`: the client accepts the delivery, releasing the reader's
/// pending credit.
pub async fn complete_order<B: OrderManagement>(
    caller: AuthenticatedProfile,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::new(path.into_inner());
    let order = api.complete_order(&caller, &order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// `POST /api/order/{id}/cancel`: either party abandons an unpaid order.
pub async fn cancel_order<B: OrderManagement>(
    caller: AuthenticatedProfile,
    path: web::Path<String>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::new(path.into_inner());
    let order = api.cancel_order(&caller, &order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------    Wallet   ----------------------------------------------------

/// `GET /api/wallet`: the caller's derived balances.
pub async fn my_wallet<B: LedgerManagement>(
    caller: AuthenticatedProfile,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let balances = api.balances_for_user(&caller.id).await?;
    Ok(HttpResponse::Ok().json(balances))
}

/// `GET /api/wallet/transactions`: the caller's full ledger, newest first.
pub async fn wallet_transactions<B: LedgerManagement>(
    caller: AuthenticatedProfile,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let entries = api.entries_for_user(&caller.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// `POST /api/wallet/withdrawals`: requests a payout of available funds to the caller's PIX key.
pub async fn request_withdrawal<B: LedgerManagement>(
    caller: AuthenticatedProfile,
    body: web::Json<WithdrawalRequest>,
    api: web::Data<LedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let entry = api.request_withdrawal(&caller, body.amount).await?;
    info!("💻️ Withdrawal {} of {} requested by {}", entry.id, body.amount, caller.id);
    Ok(HttpResponse::Ok().json(entry))
}
