use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::AbacateConfig,
    data_objects::{
        Billing,
        ChargeCustomer,
        ChargeProduct,
        ChargeStatus,
        Envelope,
        NewBillingRequest,
        NewPixQrCodeRequest,
        PixQrCode,
        StatusCheck,
    },
    AbacateApiError,
};

#[derive(Clone)]
pub struct AbacateApi {
    config: AbacateConfig,
    client: Arc<Client>,
}

impl AbacateApi {
    pub fn new(config: AbacateConfig) -> Result<Self, AbacateApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.api_key.reveal());
        let val = HeaderValue::from_str(&bearer).map_err(|e| AbacateApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AbacateApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends a request to the gateway and unwraps the `{data}|{error}` envelope. Gateway-level
    /// errors (non-2xx, or a populated `error` field) are returned as [`AbacateApiError`]s; no
    /// retry is attempted.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, AbacateApiError> {
        let url = self.url(path);
        trace!("🥑️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| AbacateApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| AbacateApiError::RequestError(e.to_string()))?;
            return Err(AbacateApiError::QueryError { status, message });
        }
        trace!("🥑️ REST query successful. {}", response.status());
        let envelope = response.json::<Envelope<T>>().await.map_err(|e| AbacateApiError::JsonError(e.to_string()))?;
        if let Some(error) = envelope.error {
            return Err(AbacateApiError::GatewayError(error));
        }
        envelope.data.ok_or(AbacateApiError::EmptyResponse)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Creates a hosted-checkout billing page for the given products and customer. The caller is
    /// redirected to `return_url` if they abandon the page and to `completion_url` after paying.
    pub async fn create_billing(
        &self,
        products: Vec<ChargeProduct>,
        customer: ChargeCustomer,
        return_url: String,
        completion_url: String,
    ) -> Result<Billing, AbacateApiError> {
        let request = NewBillingRequest::one_time_pix(products, customer, return_url, completion_url);
        debug!("🥑️ Creating billing for {} product(s)", request.products.len());
        let billing = self.rest_query::<Billing, _>(Method::POST, "/billing/create", &[], Some(request)).await?;
        info!("🥑️ Billing {} created with status {}", billing.id, billing.status);
        Ok(billing)
    }

    /// Creates a direct PIX QR-code charge.
    pub async fn create_pix_qr_code(
        &self,
        amount: arcana_common::Cents,
        description: String,
        customer: ChargeCustomer,
    ) -> Result<PixQrCode, AbacateApiError> {
        let request = NewPixQrCodeRequest { amount, description, customer, expires_in: None };
        debug!("🥑️ Creating PIX QR code charge for {amount}");
        let qr = self.rest_query::<PixQrCode, _>(Method::POST, "/pixQrCode/create", &[], Some(request)).await?;
        info!("🥑️ PIX QR code {} created with status {}", qr.id, qr.status);
        Ok(qr)
    }

    /// Polls the gateway for the current status of a PIX QR-code charge.
    pub async fn check_pix_status(&self, charge_id: &str) -> Result<ChargeStatus, AbacateApiError> {
        trace!("🥑️ Checking status of charge {charge_id}");
        let check =
            self.rest_query::<StatusCheck, ()>(Method::GET, "/pixQrCode/check", &[("id", charge_id)], None).await?;
        debug!("🥑️ Charge {charge_id} has status {}", check.status);
        Ok(check.status)
    }
}
