use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::CartApiError,
    catalog::CatalogLookup,
    db::traits::CartManagement,
    db_types::{CartId, CartMutation, CartRetrieval, CartWithItems, ProductId, Reconciliation, UserId},
};

/// `CartApi` owns every change to a user's cart. Prices come from the catalog, and each mutation is committed to
/// the ledger as a single atomic unit that keeps the cart totals equal to the sum of its lines.
#[derive(Clone)]
pub struct CartApi<B, C> {
    db: B,
    catalog: C,
}

impl<B, C> Debug for CartApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B, C> CartApi<B, C> {
    pub fn new(db: B, catalog: C) -> Self {
        Self { db, catalog }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

/// The largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

fn require_user(user_id: &UserId) -> Result<(), CartApiError> {
    if user_id.is_blank() {
        return Err(CartApiError::InvalidInput("Missing user identity.".into()));
    }
    Ok(())
}

fn require_product(product_id: &ProductId) -> Result<(), CartApiError> {
    if product_id.is_blank() {
        return Err(CartApiError::InvalidInput("Missing productId field.".into()));
    }
    Ok(())
}

impl<B, C> CartApi<B, C>
where
    B: CartManagement,
    C: CatalogLookup,
{
    /// Adds one unit of a product to the user's open cart, opening a cart if the user has none.
    ///
    /// The price is looked up before the ledger transaction starts, and the line is repriced at that price.
    pub async fn add_product_to_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<CartMutation, CartApiError> {
        require_user(user_id)?;
        require_product(product_id)?;
        let product = self.catalog.fetch_product(product_id).await?;
        let mutation = self.db.add_item_to_open_cart(user_id, product_id, product.price).await?;
        info!("🛒️ {user_id} added {product_id} to cart {} at {}", mutation.cart_id, product.price);
        Ok(mutation)
    }

    /// Sets the quantity of a product already in the user's open cart. The quantity must be between one and
    /// [`MAX_LINE_QUANTITY`]; use [`Self::remove_cart_item`] to take a product out of the cart.
    pub async fn update_cart_item_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        new_quantity: i64,
    ) -> Result<CartMutation, CartApiError> {
        require_user(user_id)?;
        require_product(product_id)?;
        if new_quantity < 1 {
            return Err(CartApiError::InvalidInput(format!(
                "newQuantity must be at least 1, but was {new_quantity}. Remove the product instead."
            )));
        }
        if new_quantity > MAX_LINE_QUANTITY {
            return Err(CartApiError::InvalidInput(format!(
                "newQuantity must be at most {MAX_LINE_QUANTITY}, but was {new_quantity}."
            )));
        }
        let product = self.catalog.fetch_product(product_id).await?;
        let mutation = self.db.set_item_quantity(user_id, product_id, new_quantity, product.price).await?;
        info!("🛒️ {user_id} set {product_id} to {new_quantity} in cart {}", mutation.cart_id);
        Ok(mutation)
    }

    pub async fn remove_cart_item(&self, user_id: &UserId, product_id: &ProductId) -> Result<CartMutation, CartApiError> {
        require_user(user_id)?;
        require_product(product_id)?;
        let mutation = self.db.remove_item_from_open_cart(user_id, product_id).await?;
        info!("🛒️ {user_id} removed {product_id} from cart {}", mutation.cart_id);
        Ok(mutation)
    }

    /// Returns the user's open cart, creating an empty one if the user has none.
    pub async fn retrieve_cart(
        &self,
        user_id: &UserId,
        cart_id: &CartId,
    ) -> Result<(CartWithItems, CartRetrieval), CartApiError> {
        require_user(user_id)?;
        if cart_id.is_blank() {
            return Err(CartApiError::InvalidInput("Need to provide a valid cart parameter.".into()));
        }
        let (cart, retrieval) = self.db.fetch_or_create_open_cart(user_id, cart_id).await?;
        debug!("🛒️ Cart {} for {user_id}: {retrieval:?}", cart.id());
        Ok((cart, retrieval))
    }

    pub async fn delete_cart(&self, user_id: &UserId) -> Result<CartId, CartApiError> {
        require_user(user_id)?;
        let id = self.db.delete_open_cart(user_id).await?;
        info!("🛒️ {user_id} deleted cart {id}");
        Ok(id)
    }

    /// Recomputes the totals of the user's open cart from its lines.
    pub async fn reconcile_cart_totals(&self, user_id: &UserId) -> Result<Reconciliation, CartApiError> {
        require_user(user_id)?;
        let result = self.db.reconcile_open_cart(user_id).await?;
        Ok(result)
    }
}
