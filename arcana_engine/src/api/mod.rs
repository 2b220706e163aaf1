mod auth_api;
mod ledger_api;
mod order_flow_api;

pub use auth_api::AuthApi;
pub use ledger_api::LedgerApi;
pub use order_flow_api::{NewOrderRequest, OrderFlowApi};
