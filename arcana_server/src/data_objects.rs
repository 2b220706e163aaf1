use abacate_tools::data_objects::ChargeStatus;
use arcana_common::Cents;
use arcana_engine::db_types::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// How the buyer wants to pay. `HostedCheckout` creates a billing page the buyer is redirected
/// to; `PixQrCode` returns a copy-paste PIX code and QR image directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    PixQrCode,
    HostedCheckout,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub gig_id: String,
    #[serde(default)]
    pub selected_addons: Vec<String>,
    #[serde(default)]
    pub requirements_answers: serde_json::Value,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// The payment instructions handed back to the buyer. Which fields are present depends on the
/// payment method chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstructions {
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub br_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub br_code_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub payment: PaymentInstructions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Cents,
}

/// The webhook payload AbacatePay POSTs on payment events. Fields we do not use are simply
/// ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookData {
    pub id: String,
    pub status: ChargeStatus,
    #[serde(default)]
    pub metadata: Option<WebhookMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMetadata {
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAuth {
    #[serde(default)]
    pub webhook_secret: Option<String>,
}
