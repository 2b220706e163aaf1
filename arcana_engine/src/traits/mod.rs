//! The traits that a storage backend must implement to power the flow APIs.
//!
//! The APIs are generic over these traits so that the business rules can be tested against mocks,
//! and so that another backend could be slotted in without touching the flow logic.

mod auth_management;
mod ledger_management;
mod order_management;

pub use auth_management::{AuthApiError, AuthManagement};
pub use ledger_management::{LedgerError, LedgerManagement};
pub use order_management::{OrderFlowError, OrderManagement};
