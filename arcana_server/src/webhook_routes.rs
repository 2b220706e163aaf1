//----------------------------------------------   Webhooks  ----------------------------------------------------

use actix_web::{web, HttpRequest, HttpResponse};
use abacate_tools::ChargeStatus;
use arcana_engine::{
    db_types::{OrderId, SettlementOutcome},
    traits::{OrderFlowError, OrderManagement},
    OrderFlowApi,
};
use log::*;

use crate::{
    config::ServerConfig,
    data_objects::{JsonResponse, WebhookAuth, WebhookEvent},
    errors::{AuthError, ServerError},
};

/// `POST /webhooks/abacate?webhookSecret=...`
///
/// AbacatePay authenticates webhook calls with a shared secret in the query string. A missing or
/// wrong secret is a 401; an unconfigured secret on our side is a 500 so the misconfiguration is
/// visible. Everything else answers 200, including business no-ops like duplicate deliveries,
/// otherwise the gateway keeps retrying an event we have already absorbed.
pub async fn abacate_webhook<B: OrderManagement>(
    req: HttpRequest,
    auth: web::Query<WebhookAuth>,
    body: web::Json<WebhookEvent>,
    api: web::Data<OrderFlowApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    trace!("🥑️ Received webhook request: {}", req.uri());
    let secret = config.webhook_secret.reveal();
    if secret.is_empty() {
        error!("🥑️ ARC_ABACATE_WEBHOOK_SECRET is not configured. Rejecting webhook call.");
        return Err(ServerError::ConfigurationError("The webhook secret is not configured".to_string()));
    }
    if auth.webhook_secret.as_deref() != Some(secret.as_str()) {
        warn!("🥑️ Webhook call arrived with a missing or invalid secret");
        return Err(ServerError::AuthenticationError(AuthError::InvalidToken));
    }
    let event = body.into_inner();
    debug!("🥑️ Webhook event {} for charge {} ({})", event.event, event.data.id, event.data.status);
    if event.data.status != ChargeStatus::Paid {
        return Ok(HttpResponse::Ok().json(JsonResponse::success("Event ignored.")));
    }
    let result = match api.settle_by_payment_id(&event.data.id).await {
        Ok(SettlementOutcome::Settled { order, .. }) => {
            info!("🥑️ Payment {} settled order {}", event.data.id, order.id);
            JsonResponse::success("Order settled.")
        },
        Ok(SettlementOutcome::AlreadySettled(order)) => {
            info!("🥑️ Payment {} was already settled against order {}", event.data.id, order.id);
            JsonResponse::success("Order already settled.")
        },
        // The charge id is unknown, e.g. the event raced the checkout response that records it.
        // Some gateway events carry the order id in their metadata, so try that before giving up.
        Err(OrderFlowError::PaymentNotFound(_)) => match order_id_from_metadata(&event) {
            Some(order_id) => match api.settle_order(&order_id).await {
                Ok(SettlementOutcome::Settled { order, .. }) => {
                    info!("🥑️ Payment {} settled order {} via metadata", event.data.id, order.id);
                    JsonResponse::success("Order settled.")
                },
                Ok(SettlementOutcome::AlreadySettled(_)) => JsonResponse::success("Order already settled."),
                Err(e) => {
                    warn!("🥑️ Could not settle order {order_id} from webhook metadata. {e}");
                    JsonResponse::failure("Could not settle order.")
                },
            },
            None => {
                warn!("🥑️ Webhook for unknown payment {}. Ignoring.", event.data.id);
                JsonResponse::failure("Unknown payment.")
            },
        },
        Err(e) => {
            warn!("🥑️ Unexpected error while handling payment notification. {e}");
            JsonResponse::failure("Unexpected error handling payment.")
        },
    };
    Ok(HttpResponse::Ok().json(result))
}

fn order_id_from_metadata(event: &WebhookEvent) -> Option<OrderId> {
    event.data.metadata.as_ref().and_then(|m| m.order_id.as_deref()).map(OrderId::from)
}
