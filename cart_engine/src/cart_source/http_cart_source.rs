use std::sync::Arc;

use log::*;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::Deserialize;

use crate::{
    cart_source::{CartServiceConfig, CartSource, CartSourceError, Credentials},
    db_types::{CartId, CartWithItems},
};

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Reads carts from a remote cart service, forwarding the caller's bearer token.
#[derive(Debug, Clone)]
pub struct HttpCartSource {
    config: CartServiceConfig,
    client: Arc<Client>,
}

#[derive(Deserialize)]
struct CartServiceResponse {
    success: bool,
    data: Option<CartPayload>,
}

/// The cart arrives either as the bare cart object or wrapped in a `cart` field, which may itself be a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum CartPayload {
    Wrapped { cart: CartList },
    Bare(Box<CartWithItems>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CartList {
    Many(Vec<CartWithItems>),
    One(Box<CartWithItems>),
}

impl CartServiceResponse {
    fn into_cart(self, cart_id: &CartId) -> Result<CartWithItems, CartSourceError> {
        let not_found = || CartSourceError::CartNotFound(cart_id.clone());
        if !self.success {
            return Err(not_found());
        }
        let cart = match self.data.ok_or_else(not_found)? {
            CartPayload::Bare(cart) => *cart,
            CartPayload::Wrapped { cart: CartList::One(cart) } => *cart,
            CartPayload::Wrapped { cart: CartList::Many(carts) } => carts.into_iter().next().ok_or_else(not_found)?,
        };
        if cart.id() != cart_id {
            debug!("🛒️ Cart service returned cart {} when asked for {cart_id}", cart.id());
            return Err(not_found());
        }
        Ok(cart)
    }
}

impl HttpCartSource {
    pub fn new(config: CartServiceConfig) -> Result<Self, CartSourceError> {
        let client =
            Client::builder().timeout(config.timeout).build().map_err(|e| CartSourceError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, cart_id: &CartId) -> String {
        format!("{}/cart/{cart_id}", self.config.base_url)
    }
}

impl CartSource for HttpCartSource {
    async fn fetch_cart(&self, cart_id: &CartId, credentials: &Credentials) -> Result<CartWithItems, CartSourceError> {
        let url = self.url(cart_id);
        trace!("🛒️ Fetching cart from {url}");
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", credentials.access_token.reveal()))
            .header(USER_ID_HEADER, credentials.user_id.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!("🛒️ Cart service request for {cart_id} failed: {e}");
                CartSourceError::Unavailable(e.to_string())
            })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CartSourceError::CartNotFound(cart_id.clone()));
        }
        if !status.is_success() {
            warn!("🛒️ Cart service responded to {url} with {status}");
            return Err(CartSourceError::Unavailable(format!("Cart service responded with {status}")));
        }
        let body = response.json::<CartServiceResponse>().await.map_err(|e| {
            warn!("🛒️ Could not read cart service response for {cart_id}: {e}");
            CartSourceError::Unavailable(e.to_string())
        })?;
        body.into_cart(cart_id)
    }
}
