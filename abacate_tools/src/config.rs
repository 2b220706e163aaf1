use std::env;

use arcana_common::Secret;
use log::*;

pub const DEFAULT_ABACATE_BASE_URL: &str = "https://api.abacatepay.com/v1";

#[derive(Clone, Debug, Default)]
pub struct AbacateConfig {
    /// Base URL for the AbacatePay REST API, without a trailing slash.
    pub base_url: String,
    /// The API key, sent as a bearer token on every request.
    pub api_key: Secret<String>,
}

impl AbacateConfig {
    pub fn new(base_url: &str, api_key: Secret<String>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), api_key }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = env::var("ARC_ABACATE_BASE_URL").ok().unwrap_or_else(|| {
            info!("🥑️ ARC_ABACATE_BASE_URL is not set. Using the default, {DEFAULT_ABACATE_BASE_URL}.");
            DEFAULT_ABACATE_BASE_URL.to_string()
        });
        let api_key = env::var("ARC_ABACATE_API_KEY").ok().unwrap_or_else(|| {
            error!("🥑️ ARC_ABACATE_API_KEY is not set. Payment requests will be rejected by the gateway.");
            String::default()
        });
        Self::new(&base_url, Secret::new(api_key))
    }
}
