use std::time::Duration;

use log::*;

const DEFAULT_CATALOG_URL: &str = "http://localhost:5000/v1/api/products";
const DEFAULT_CATALOG_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Product lookups are sent to `{base_url}/{product_id}`
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_CATALOG_TIMEOUT_MS),
        }
    }
}

impl CatalogConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), timeout }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("CART_CATALOG_URL").unwrap_or_else(|_| {
            warn!("CART_CATALOG_URL not set, using {DEFAULT_CATALOG_URL} as default");
            DEFAULT_CATALOG_URL.to_string()
        });
        let timeout = std::env::var("CART_CATALOG_TIMEOUT_MS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for CART_CATALOG_TIMEOUT_MS ({s}): {e}. Using the default."))
                    .ok()
            })
            .unwrap_or(DEFAULT_CATALOG_TIMEOUT_MS);
        Self::new(&base_url, Duration::from_millis(timeout))
    }
}
