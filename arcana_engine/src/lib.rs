//! Arcana Engine
//!
//! The Arcana engine is the storage and domain layer for the Arcana marketplace, a platform that
//! connects clients with tarot readers and settles payments over PIX. This library contains the
//! core logic for the checkout and wallet flows. It is HTTP-framework agnostic.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You
//!    should rarely need to access the database directly; use the public APIs instead. The
//!    exception is the data types used in the database, defined in [`mod@db_types`].
//! 2. The backend traits ([`mod@traits`]). Any storage backend must implement these in order to
//!    drive the flow APIs.
//! 3. The flow APIs ([`OrderFlowApi`], [`LedgerApi`], [`AuthApi`]), which carry the business
//!    rules: order intake checks, payment settlement, ledger arithmetic, and withdrawal
//!    validation.

mod api;

pub mod db_types;
pub mod helpers;
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{AuthApi, LedgerApi, NewOrderRequest, OrderFlowApi};
pub use sqlite::SqliteDatabase;
