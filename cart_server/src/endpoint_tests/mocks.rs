use cart_engine::{
    cart_source::{CartSource, CartSourceError, Credentials},
    catalog::{CatalogError, CatalogLookup, Product},
    db_types::{
        CartId,
        CartMutation,
        CartRetrieval,
        CartWithItems,
        Money,
        NewOrder,
        Order,
        OrderId,
        OrderStatusType,
        ProductId,
        Reconciliation,
        UserId,
    },
    CartManagement,
    LedgerError,
    OrderManagement,
};
use mockall::mock;

mock! {
    pub CartStore {}
    impl Clone for CartStore {
        fn clone(&self) -> Self;
    }
    impl CartManagement for CartStore {
        fn url(&self) -> &str;
        async fn add_item_to_open_cart(&self, user_id: &UserId, product_id: &ProductId, unit_price: Money) -> Result<CartMutation, LedgerError>;
        async fn set_item_quantity(&self, user_id: &UserId, product_id: &ProductId, quantity: i64, unit_price: Money) -> Result<CartMutation, LedgerError>;
        async fn remove_item_from_open_cart(&self, user_id: &UserId, product_id: &ProductId) -> Result<CartMutation, LedgerError>;
        async fn fetch_or_create_open_cart(&self, user_id: &UserId, cart_id: &CartId) -> Result<(CartWithItems, CartRetrieval), LedgerError>;
        async fn delete_open_cart(&self, user_id: &UserId) -> Result<CartId, LedgerError>;
        async fn fetch_open_cart(&self, user_id: &UserId) -> Result<Option<CartWithItems>, LedgerError>;
        async fn fetch_cart(&self, cart_id: &CartId) -> Result<Option<CartWithItems>, LedgerError>;
        async fn reconcile_open_cart(&self, user_id: &UserId) -> Result<Reconciliation, LedgerError>;
    }
}

mock! {
    pub Catalog {}
    impl CatalogLookup for Catalog {
        async fn fetch_product(&self, product_id: &ProductId) -> Result<Product, CatalogError>;
    }
}

mock! {
    pub OrderStore {}
    impl Clone for OrderStore {
        fn clone(&self) -> Self;
    }
    impl OrderManagement for OrderStore {
        async fn insert_order_for_cart(&self, order: NewOrder) -> Result<OrderId, LedgerError>;
        async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, LedgerError>;
        async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, LedgerError>;
        async fn update_order_status(&self, order_id: &OrderId, status: OrderStatusType) -> Result<Order, LedgerError>;
    }
}

mock! {
    pub RemoteCarts {}
    impl CartSource for RemoteCarts {
        async fn fetch_cart(&self, cart_id: &CartId, credentials: &Credentials) -> Result<CartWithItems, CartSourceError>;
    }
}
