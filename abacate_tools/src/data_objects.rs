use arcana_common::Cents;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A line item on a charge. `price` is in integer centavos, as the gateway expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeProduct {
    pub external_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCustomer {
    pub name: String,
    pub email: String,
    pub cellphone: String,
    pub tax_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillingRequest {
    pub frequency: String,
    pub methods: Vec<String>,
    pub products: Vec<ChargeProduct>,
    pub customer: ChargeCustomer,
    pub return_url: String,
    pub completion_url: String,
}

impl NewBillingRequest {
    pub fn one_time_pix(
        products: Vec<ChargeProduct>,
        customer: ChargeCustomer,
        return_url: String,
        completion_url: String,
    ) -> Self {
        Self {
            frequency: "ONE_TIME".to_string(),
            methods: vec!["PIX".to_string()],
            products,
            customer,
            return_url,
            completion_url,
        }
    }
}

/// A hosted-checkout charge, as returned by `POST /billing/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub id: String,
    pub url: String,
    pub status: ChargeStatus,
    #[serde(default)]
    pub amount: Option<Cents>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPixQrCodeRequest {
    pub amount: Cents,
    pub description: String,
    pub customer: ChargeCustomer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
}

/// A direct PIX QR-code charge, as returned by `POST /pixQrCode/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixQrCode {
    pub id: String,
    pub br_code: String,
    pub br_code_base64: String,
    pub status: ChargeStatus,
    #[serde(default)]
    pub amount: Option<Cents>,
}

/// Charge status as reported by the gateway. Unrecognised values deserialize to `Unknown` rather
/// than failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Expired,
    Cancelled,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeStatus::Pending => write!(f, "PENDING"),
            ChargeStatus::Paid => write!(f, "PAID"),
            ChargeStatus::Expired => write!(f, "EXPIRED"),
            ChargeStatus::Cancelled => write!(f, "CANCELLED"),
            ChargeStatus::Refunded => write!(f, "REFUNDED"),
            ChargeStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Every AbacatePay response wraps its payload in `{data: ...}` on success, or `{error: ...}` on
/// failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheck {
    pub status: ChargeStatus,
}
