use cart_engine::{
    cart_source::LedgerCartSource,
    db_types::OrderId,
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        price_list::PriceList,
    },
    CartApi,
    CartApiError,
    OrderApi,
    OrderApiError,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

#[derive(Default, Debug, World)]
pub struct CartWorld {
    pub system: Option<CommerceSystem>,
    /// The kind of failure the last attempted request ended with
    pub last_error: Option<&'static str>,
    pub last_order: Option<OrderId>,
}

#[derive(Debug)]
pub struct CommerceSystem {
    pub db_path: String,
    pub prices: PriceList,
    pub carts: CartApi<SqliteDatabase, PriceList>,
    pub orders: OrderApi<SqliteDatabase, LedgerCartSource<SqliteDatabase>>,
}

impl CartWorld {
    pub fn system(&self) -> &CommerceSystem {
        self.system.as_ref().expect("Ledger not initialised")
    }

    pub fn carts(&self) -> &CartApi<SqliteDatabase, PriceList> {
        &self.system().carts
    }

    pub fn orders(&self) -> &OrderApi<SqliteDatabase, LedgerCartSource<SqliteDatabase>> {
        &self.system().orders
    }

    pub fn last_order(&self) -> OrderId {
        self.last_order.clone().expect("No order has been placed")
    }
}

impl CommerceSystem {
    pub async fn new() -> Self {
        let db_path = random_db_path();
        let db = prepare_test_env(&db_path, 2).await;
        debug!("Created database: {db_path}");
        let prices = PriceList::new();
        let carts = CartApi::new(db.clone(), prices.clone());
        let orders = OrderApi::new(db.clone(), LedgerCartSource::new(db));
        Self { db_path, prices, carts, orders }
    }
}

pub fn cart_error_kind(e: &CartApiError) -> &'static str {
    match e {
        CartApiError::InvalidInput(_) => "invalid-input",
        CartApiError::ProductNotFound(_) | CartApiError::CartNotFound(_) | CartApiError::ItemNotInCart(_) => {
            "not-found"
        },
        CartApiError::CatalogUnavailable(_) => "unavailable",
        CartApiError::DatabaseError(_) => "internal",
    }
}

pub fn order_error_kind(e: &OrderApiError) -> &'static str {
    match e {
        OrderApiError::InvalidInput(_) => "invalid-input",
        OrderApiError::CartNotFound(_) | OrderApiError::OrderNotFound(_) | OrderApiError::NoOrdersFound(_) => {
            "not-found"
        },
        OrderApiError::CartAlreadyOrdered { .. } | OrderApiError::ForbiddenStatusChange { .. } => "conflict",
        OrderApiError::CartStoreUnavailable(_) => "unavailable",
        OrderApiError::DatabaseError(_) => "internal",
    }
}
