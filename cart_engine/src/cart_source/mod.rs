//! Reading a cart on behalf of the order flow.
//!
//! Orders are built from a cart that belongs to the caller. The cart can come straight from the shared ledger, or
//! from a separately deployed cart service, in which case the caller's credentials are forwarded.
mod config;
mod errors;
mod http_cart_source;
mod ledger_cart_source;

use cart_common::Secret;
pub use config::CartServiceConfig;
pub use errors::CartSourceError;
pub use http_cart_source::HttpCartSource;
pub use ledger_cart_source::LedgerCartSource;

use crate::{
    db::traits::CartManagement,
    db_types::{CartId, CartWithItems, UserId},
};

/// The caller on whose behalf a cart is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: UserId,
    pub access_token: Secret<String>,
}

impl Credentials {
    pub fn new(user_id: UserId, access_token: &str) -> Self {
        Self { user_id, access_token: Secret::new(access_token.to_string()) }
    }
}

#[allow(async_fn_in_trait)]
pub trait CartSource {
    /// Fetches a cart owned by the caller.
    ///
    /// A cart that does not exist, or that belongs to someone else, is reported as
    /// [`CartSourceError::CartNotFound`].
    async fn fetch_cart(&self, cart_id: &CartId, credentials: &Credentials) -> Result<CartWithItems, CartSourceError>;
}

/// Selects the cart source at start-up.
#[derive(Debug, Clone)]
pub enum AnyCartSource<B> {
    Ledger(LedgerCartSource<B>),
    Remote(HttpCartSource),
}

impl<B: CartManagement> CartSource for AnyCartSource<B> {
    async fn fetch_cart(&self, cart_id: &CartId, credentials: &Credentials) -> Result<CartWithItems, CartSourceError> {
        match self {
            AnyCartSource::Ledger(source) => source.fetch_cart(cart_id, credentials).await,
            AnyCartSource::Remote(source) => source.fetch_cart(cart_id, credentials).await,
        }
    }
}
