use crate::{
    db::traits::LedgerError,
    db_types::{CartId, CartMutation, CartRetrieval, CartWithItems, Money, ProductId, Reconciliation, UserId},
};

/// Cart mutations and reads. Every mutation runs in a single transaction that locks the user's open cart before it
/// reads anything, so concurrent mutations for the same user are serialized.
#[allow(async_fn_in_trait)]
pub trait CartManagement: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Adds one unit of `product_id` to the user's open cart, creating the cart and/or line if necessary.
    ///
    /// The line's unit price is set to `unit_price` and its total becomes `quantity * unit_price`. The cart totals
    /// move by exactly the change in the line's quantity and total.
    async fn add_item_to_open_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        unit_price: Money,
    ) -> Result<CartMutation, LedgerError>;

    /// Sets the quantity of an existing line in the user's open cart. `quantity` must be at least 1.
    ///
    /// Fails with [`LedgerError::NoOpenCart`] if the user has no open cart, and [`LedgerError::ItemNotInCart`] if the
    /// product is not in it. A line total that would not fit fails with [`LedgerError::QuantityTooLarge`] and writes
    /// nothing.
    async fn set_item_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> Result<CartMutation, LedgerError>;

    /// Deletes a line from the user's open cart and subtracts its stored quantity and total from the cart totals.
    async fn remove_item_from_open_cart(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<CartMutation, LedgerError>;

    /// Returns the user's open cart. If `cart_id` does not name it, the user's open cart is returned anyway. If the
    /// user has no open cart, an empty one is created.
    async fn fetch_or_create_open_cart(
        &self,
        user_id: &UserId,
        cart_id: &CartId,
    ) -> Result<(CartWithItems, CartRetrieval), LedgerError>;

    /// Deletes the user's open cart and all its lines. Returns the id of the deleted cart.
    async fn delete_open_cart(&self, user_id: &UserId) -> Result<CartId, LedgerError>;

    /// Read-only lookup of the user's open cart.
    async fn fetch_open_cart(&self, user_id: &UserId) -> Result<Option<CartWithItems>, LedgerError>;

    /// Read-only lookup of any cart, open or closed.
    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Option<CartWithItems>, LedgerError>;

    /// Recomputes the user's open cart totals from its line items, overwriting the stored totals.
    async fn reconcile_open_cart(&self, user_id: &UserId) -> Result<Reconciliation, LedgerError>;
}
