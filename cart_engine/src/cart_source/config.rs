use std::time::Duration;

use log::*;

const DEFAULT_CART_SERVICE_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct CartServiceConfig {
    /// Carts are read from `{base_url}/cart/{cart_id}`
    pub base_url: String,
    pub timeout: Duration,
}

impl CartServiceConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), timeout }
    }

    /// Returns `None` if `CART_SERVICE_URL` is not set, meaning carts are read from the local ledger.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("CART_SERVICE_URL").ok().filter(|s| !s.trim().is_empty())?;
        let timeout = std::env::var("CART_SERVICE_TIMEOUT_MS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for CART_SERVICE_TIMEOUT_MS ({s}): {e}. Using the default."))
                    .ok()
            })
            .unwrap_or(DEFAULT_CART_SERVICE_TIMEOUT_MS);
        Some(Self::new(&base_url, Duration::from_millis(timeout)))
    }
}
