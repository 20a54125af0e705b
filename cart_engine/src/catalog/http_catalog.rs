use std::sync::Arc;

use log::*;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    catalog::{CatalogConfig, CatalogError, CatalogLookup, Product},
    db_types::ProductId,
};

/// Catalog lookups over HTTP. Every request is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    config: CatalogConfig,
    client: Arc<Client>,
}

#[derive(Deserialize)]
struct CatalogResponse {
    success: bool,
    #[serde(default)]
    data: Vec<Product>,
}

impl CatalogResponse {
    fn into_product(self, product_id: &ProductId) -> Result<Product, CatalogError> {
        if !self.success {
            return Err(CatalogError::ProductNotFound(product_id.clone()));
        }
        self.data.into_iter().next().ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))
    }
}

impl HttpCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client =
            Client::builder().timeout(config.timeout).build().map_err(|e| CatalogError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, product_id: &ProductId) -> String {
        format!("{}/{product_id}", self.config.base_url)
    }
}

impl CatalogLookup for HttpCatalog {
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Product, CatalogError> {
        let url = self.url(product_id);
        trace!("🛒️ Fetching product from {url}");
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("🛒️ Catalog request for {product_id} failed: {e}");
            CatalogError::Unavailable(e.to_string())
        })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("🛒️ Catalog does not know product {product_id}");
            return Err(CatalogError::ProductNotFound(product_id.clone()));
        }
        if !status.is_success() {
            warn!("🛒️ Catalog responded to {url} with {status}");
            return Err(CatalogError::Unavailable(format!("Catalog responded with {status}")));
        }
        let body = response.json::<CatalogResponse>().await.map_err(|e| {
            warn!("🛒️ Could not read catalog response for {product_id}: {e}");
            CatalogError::Unavailable(e.to_string())
        })?;
        let product = body.into_product(product_id)?;
        debug!("🛒️ Product {product_id} costs {}", product.price);
        Ok(product)
    }
}
