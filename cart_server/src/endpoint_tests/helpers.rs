use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use cart_engine::{
    db_types::{Cart, CartId, CartItem, CartItemId, CartWithItems, Money, Order, OrderId, OrderStatusType, ProductId, UserId},
    CartApi,
    OrderApi,
};
use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use super::mocks::{MockCartStore, MockCatalog, MockOrderStore, MockRemoteCarts};
use crate::{
    auth::USER_ID_HEADER,
    envelope::Envelope,
    routes::{health, json_config, not_found},
    server::configure_routes,
};

/// The collaborators behind a test app. Mocks without expectations fail the test if they are called.
#[derive(Default)]
pub struct Mocks {
    pub cart_store: MockCartStore,
    pub catalog: MockCatalog,
    pub order_store: MockOrderStore,
    pub remote_carts: MockRemoteCarts,
}

/// Sends `req` through the full route table and decodes the response envelope.
pub async fn call(mocks: Mocks, req: TestRequest) -> (StatusCode, Envelope) {
    let _ = env_logger::try_init();
    let cart_api = web::Data::new(CartApi::new(mocks.cart_store, mocks.catalog));
    let order_api = web::Data::new(OrderApi::new(mocks.order_store, mocks.remote_carts));
    let app = App::new()
        .app_data(cart_api)
        .app_data(order_api)
        .app_data(json_config())
        .service(health)
        .service(
            web::scope("/v1/api")
                .configure(configure_routes::<MockCartStore, MockCatalog, MockOrderStore, MockRemoteCarts>),
        )
        .default_service(web::to(not_found));
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    debug!("Response ({status}): {}", String::from_utf8_lossy(&body));
    let envelope = serde_json::from_slice(&body).expect("Response body was not an envelope");
    (status, envelope)
}

/// Adds the gateway identity headers for `user` to the request.
pub fn as_user(req: TestRequest, user: &str) -> TestRequest {
    req.insert_header((USER_ID_HEADER, user)).insert_header(("Authorization", format!("Bearer token-for-{user}")))
}

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap()
}

/// A cart holding the given `(product, quantity, unit price in cents)` lines, with consistent totals.
pub fn cart_with(cart_id: &str, user: &str, lines: &[(&str, i64, i64)]) -> CartWithItems {
    let items = lines
        .iter()
        .enumerate()
        .map(|(i, (product, quantity, cents))| CartItem {
            id: CartItemId::from(format!("item-{i}")),
            cart_id: CartId::from(cart_id),
            product_id: ProductId::from(*product),
            quantity: *quantity,
            unit_price: Money::from_cents(*cents),
            total_price: Money::from_cents(*cents) * *quantity,
            created_at: timestamp(),
            updated_at: timestamp(),
        })
        .collect::<Vec<_>>();
    let mut cart = CartWithItems {
        cart: Cart {
            id: CartId::from(cart_id),
            user_id: UserId::from(user),
            total_quantity: 0,
            overall_total_price: Money::default(),
            closed: false,
            created_at: timestamp(),
            updated_at: timestamp(),
        },
        items,
    };
    let totals = cart.item_totals();
    cart.cart.total_quantity = totals.total_quantity;
    cart.cart.overall_total_price = totals.overall_total_price;
    cart
}

pub fn order(id: &str, cart_id: &str, user: &str, status: OrderStatusType) -> Order {
    Order {
        id: OrderId::from(id),
        cart_id: CartId::from(cart_id),
        user_id: UserId::from(user),
        status,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}
