use log::*;

use crate::{
    cart_source::{CartSource, CartSourceError, Credentials},
    db::traits::CartManagement,
    db_types::{CartId, CartWithItems},
};

/// Reads carts directly from the ledger that orders are written to.
#[derive(Debug, Clone)]
pub struct LedgerCartSource<B> {
    db: B,
}

impl<B> LedgerCartSource<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B: CartManagement> CartSource for LedgerCartSource<B> {
    async fn fetch_cart(&self, cart_id: &CartId, credentials: &Credentials) -> Result<CartWithItems, CartSourceError> {
        let cart = self
            .db
            .fetch_cart(cart_id)
            .await
            .map_err(|e| CartSourceError::Unavailable(e.to_string()))?
            .ok_or_else(|| CartSourceError::CartNotFound(cart_id.clone()))?;
        if cart.cart.user_id != credentials.user_id {
            debug!("🛒️ Cart {cart_id} does not belong to {}", credentials.user_id);
            return Err(CartSourceError::CartNotFound(cart_id.clone()));
        }
        Ok(cart)
    }
}
