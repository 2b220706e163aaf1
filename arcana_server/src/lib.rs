//! # Arcana server
//! This module hosts the REST server for the Arcana marketplace. It is responsible for:
//! Authenticating requests against the session store.
//! Driving the checkout flow, including creating charges on the AbacatePay gateway.
//! Listening for incoming payment webhooks from AbacatePay and reconciling payment status.
//! Serving wallet balances, ledgers and withdrawal requests for readers.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! All business routes live under `/api` and require a session token. The exceptions are
//! `/health` and the `/webhooks/abacate` endpoint, which authenticates with a shared secret
//! instead.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod webhook_routes;

#[cfg(test)]
mod endpoint_tests;
