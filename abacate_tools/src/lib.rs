//! A thin client for the AbacatePay REST API.
//!
//! AbacatePay is the PIX payment gateway used by the Arcana marketplace. Two charge styles are
//! supported: a hosted billing page (`/billing/create`) and a direct PIX QR code
//! (`/pixQrCode/create`). Both return a gateway charge id that the payment server persists on the
//! order and later uses to reconcile payment status, either via webhook or by polling
//! `/pixQrCode/check`.

pub mod api;
pub mod config;
pub mod data_objects;
mod error;

pub use api::AbacateApi;
pub use config::AbacateConfig;
pub use data_objects::{Billing, ChargeCustomer, ChargeProduct, ChargeStatus, PixQrCode};
pub use error::AbacateApiError;
