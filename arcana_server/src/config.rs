use std::env;

use abacate_tools::AbacateConfig;
use arcana_common::Secret;
use log::*;

const DEFAULT_ARC_HOST: &str = "127.0.0.1";
const DEFAULT_ARC_PORT: u16 = 4000;
const DEFAULT_RETURN_URL: &str = "https://arcana.example.com/checkout/cancelled";
const DEFAULT_COMPLETION_URL: &str = "https://arcana.example.com/checkout/complete";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// AbacatePay REST API configuration.
    pub abacate: AbacateConfig,
    /// The shared secret AbacatePay appends to webhook calls as `?webhookSecret=...`. If this is
    /// not configured, all webhook calls are rejected.
    pub webhook_secret: Secret<String>,
    /// Where the hosted checkout page sends buyers who abandon the payment.
    pub checkout_return_url: String,
    /// Where the hosted checkout page sends buyers after paying.
    pub checkout_completion_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ARC_HOST.to_string(),
            port: DEFAULT_ARC_PORT,
            database_url: String::default(),
            abacate: AbacateConfig::default(),
            webhook_secret: Secret::default(),
            checkout_return_url: DEFAULT_RETURN_URL.to_string(),
            checkout_completion_url: DEFAULT_COMPLETION_URL.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("ARC_HOST").ok().unwrap_or_else(|| DEFAULT_ARC_HOST.into());
        let port = env::var("ARC_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for ARC_PORT. {e} Using the default, {DEFAULT_ARC_PORT}, \
                         instead."
                    );
                    DEFAULT_ARC_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_ARC_PORT);
        let database_url = env::var("ARC_DATABASE_URL").unwrap_or_else(|_| {
            error!("🪛️ ARC_DATABASE_URL is not set. Please set it to the database URL for the server.");
            String::default()
        });
        let webhook_secret = env::var("ARC_ABACATE_WEBHOOK_SECRET").map(Secret::new).unwrap_or_else(|_| {
            warn!("🪛️ ARC_ABACATE_WEBHOOK_SECRET is not set. All webhook calls will be rejected.");
            Secret::default()
        });
        let checkout_return_url =
            env::var("ARC_CHECKOUT_RETURN_URL").ok().unwrap_or_else(|| DEFAULT_RETURN_URL.to_string());
        let checkout_completion_url =
            env::var("ARC_CHECKOUT_COMPLETION_URL").ok().unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string());
        Self {
            host,
            port,
            database_url,
            abacate: AbacateConfig::new_from_env_or_default(),
            webhook_secret,
            checkout_return_url,
            checkout_completion_url,
        }
    }
}
