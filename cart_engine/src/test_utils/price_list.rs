use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        RwLock,
    },
};

use cart_common::Money;

use crate::{
    catalog::{CatalogError, CatalogLookup, Product},
    db_types::ProductId,
};

/// An in-memory catalog. Clones share the same prices, so a test can reprice products while an API holds a copy.
#[derive(Debug, Clone, Default)]
pub struct PriceList {
    prices: Arc<RwLock<HashMap<ProductId, Money>>>,
    offline: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl PriceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, product_id: &str, price: Money) -> Self {
        self.set_price(product_id, price);
        self
    }

    pub fn set_price(&self, product_id: &str, price: Money) {
        let mut prices = self.prices.write().expect("Price list lock poisoned");
        prices.insert(ProductId::from(product_id), price);
    }

    pub fn remove(&self, product_id: &str) {
        let mut prices = self.prices.write().expect("Price list lock poisoned");
        prices.remove(&ProductId::from(product_id));
    }

    /// While offline, every lookup fails as if the catalog could not be reached.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl CatalogLookup for PriceList {
    async fn fetch_product(&self, product_id: &ProductId) -> Result<Product, CatalogError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("The price list is offline".into()));
        }
        let prices = self.prices.read().expect("Price list lock poisoned");
        prices
            .get(product_id)
            .map(|price| Product::new(product_id.clone(), product_id.as_str(), *price))
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))
    }
}
