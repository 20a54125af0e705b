use actix_web::{http::StatusCode, test::TestRequest};
use cart_engine::{
    catalog::{CatalogError, Product},
    db_types::{CartId, CartMutation, CartRetrieval, CartTotals, Money, ProductId, Reconciliation, UserId},
    LedgerError,
};
use serde_json::json;

use super::{
    helpers::{as_user, call, cart_with, Mocks},
    mocks::MockCatalog,
};

fn catalog_with(product: &'static str, cents: i64) -> MockCatalog {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_fetch_product()
        .withf(move |id| id.as_str() == product)
        .returning(move |id| Ok(Product::new(id.clone(), "Mug", Money::from_cents(cents))));
    catalog
}

fn mutation(cart_id: &str, product: &str, quantity_delta: i64, cents: i64) -> CartMutation {
    CartMutation {
        cart_id: CartId::from(cart_id),
        product_id: ProductId::from(product),
        item: None,
        quantity_delta,
        price_delta: Money::from_cents(cents),
        cart_created: false,
    }
}

#[actix_web::test]
async fn add_product_prices_from_the_catalog() {
    let mut mocks = Mocks { catalog: catalog_with("p1", 1000), ..Default::default() };
    mocks
        .cart_store
        .expect_add_item_to_open_cart()
        .withf(|user, product, price| {
            user.as_str() == "alice" && product.as_str() == "p1" && *price == Money::from_units(10)
        })
        .times(1)
        .returning(|_, _, _| Ok(mutation("c1", "p1", 1, 1000)));
    let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice").set_json(json!({"productId": "p1"}));
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(envelope.success);
    assert_eq!(envelope.status_code, 201);
    assert_eq!(envelope.data, Some(json!("Successfully added product.")));
    assert!(envelope.error.is_none());
}

#[actix_web::test]
async fn add_product_needs_a_product_id() {
    let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice").set_json(json!({}));
    let (status, envelope) = call(Mocks::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!envelope.success);
    let error = envelope.error.unwrap();
    assert_eq!(error.code, 400);
    assert_eq!(error.message, "Missing productId field.");
}

#[actix_web::test]
async fn add_unknown_product() {
    let mut mocks = Mocks::default();
    mocks.catalog.expect_fetch_product().returning(|id| Err(CatalogError::ProductNotFound(id.clone())));
    let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice").set_json(json!({"productId": "p9"}));
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.error.unwrap().message, "Product was not found.");
}

#[actix_web::test]
async fn add_while_the_catalog_is_down() {
    let mut mocks = Mocks::default();
    mocks.catalog.expect_fetch_product().returning(|_| Err(CatalogError::Unavailable("connection refused".into())));
    let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice").set_json(json!({"productId": "p1"}));
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = envelope.error.unwrap();
    assert_eq!(error.code, 500);
    assert_eq!(error.message, "Something went wrong whilst fetching the product.");
    assert_eq!(error.details, Some(json!("connection refused")));
}

#[actix_web::test]
async fn add_with_a_non_json_body() {
    let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice")
        .insert_header(("Content-Type", "text/plain"))
        .set_payload("productId=p1");
    let (status, envelope) = call(Mocks::default(), req).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(envelope.error.unwrap().code, 415);
}

#[actix_web::test]
async fn add_with_malformed_json() {
    let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"productId\": ");
    let (status, envelope) = call(Mocks::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!envelope.success);
}

#[actix_web::test]
async fn cart_routes_need_an_identity() {
    let req = TestRequest::post().uri("/v1/api/cart/add").set_json(json!({"productId": "p1"}));
    let (status, envelope) = call(Mocks::default(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(envelope.error.unwrap().code, 401);
}

#[actix_web::test]
async fn update_quantity() {
    let mut mocks = Mocks { catalog: catalog_with("p1", 1000), ..Default::default() };
    mocks
        .cart_store
        .expect_set_item_quantity()
        .withf(|_, product, quantity, price| {
            product.as_str() == "p1" && *quantity == 5 && *price == Money::from_units(10)
        })
        .times(1)
        .returning(|_, _, _, _| Ok(mutation("c1", "p1", 3, 3000)));
    let req = as_user(TestRequest::put().uri("/v1/api/cart/update"), "alice")
        .set_json(json!({"productId": "p1", "newQuantity": 5}));
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.data, Some(json!("Cart updated")));
}

#[actix_web::test]
async fn update_quantity_rejects_bad_input() {
    for body in [json!({"productId": "p1", "newQuantity": 0}), json!({"productId": "p1"}), json!({"newQuantity": 2})] {
        let req = as_user(TestRequest::put().uri("/v1/api/cart/update"), "alice").set_json(body);
        let (status, _) = call(Mocks::default(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn update_quantity_refuses_huge_quantities() {
    let req = as_user(TestRequest::put().uri("/v1/api/cart/update"), "alice")
        .set_json(json!({"productId": "p1", "newQuantity": 100_000_000_000_000_000_i64}));
    // No store or catalog expectations: nothing may be written
    let (status, envelope) = call(Mocks::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!envelope.success);
    assert_eq!(envelope.status_code, 400);
    let error = envelope.error.unwrap();
    assert_eq!(error.code, 400);
    assert!(error.message.contains("newQuantity"), "{}", error.message);
}

#[actix_web::test]
async fn update_quantity_with_an_unrepresentable_total() {
    let mut mocks = Mocks { catalog: catalog_with("p1", i64::MAX / 10), ..Default::default() };
    mocks.cart_store.expect_set_item_quantity().times(1).returning(|_, _, quantity, unit_price| {
        Err(LedgerError::QuantityTooLarge { quantity, unit_price })
    });
    let req = as_user(TestRequest::put().uri("/v1/api/cart/update"), "alice")
        .set_json(json!({"productId": "p1", "newQuantity": 20}));
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope.error.unwrap().code, 400);
}

#[actix_web::test]
async fn update_a_product_that_is_not_in_the_cart() {
    let mut mocks = Mocks { catalog: catalog_with("p2", 400), ..Default::default() };
    mocks.cart_store.expect_set_item_quantity().returning(|_, product, _, _| {
        Err(LedgerError::ItemNotInCart { cart_id: CartId::from("c1"), product_id: product.clone() })
    });
    let req = as_user(TestRequest::put().uri("/v1/api/cart/update"), "alice")
        .set_json(json!({"productId": "p2", "newQuantity": 2}));
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.error.unwrap().message, "Product not found in cart.");
}

#[actix_web::test]
async fn remove_product() {
    let mut mocks = Mocks::default();
    mocks
        .cart_store
        .expect_remove_item_from_open_cart()
        .withf(|user, product| user.as_str() == "alice" && product.as_str() == "p1")
        .times(1)
        .returning(|_, _| Ok(mutation("c1", "p1", -2, -2000)));
    let req = as_user(TestRequest::delete().uri("/v1/api/cart/p1"), "alice");
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.data, Some(json!("Product removed from cart")));
}

#[actix_web::test]
async fn remove_without_an_open_cart() {
    let mut mocks = Mocks::default();
    mocks.cart_store.expect_remove_item_from_open_cart().returning(|user, _| Err(LedgerError::NoOpenCart(user.clone())));
    let req = as_user(TestRequest::delete().uri("/v1/api/cart/p1"), "alice");
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope.error.unwrap().message, "Cart not found.");
}

#[actix_web::test]
async fn get_cart_reports_whether_it_was_created() {
    for (retrieval, message) in [
        (CartRetrieval::Created, "No cart found. New empty cart created."),
        (CartRetrieval::Retrieved, "Cart successfully retrieved."),
    ] {
        let mut mocks = Mocks::default();
        mocks
            .cart_store
            .expect_fetch_or_create_open_cart()
            .withf(|user, cart_id| user == &UserId::from("alice") && cart_id.as_str() == "c1")
            .returning(move |_, _| Ok((cart_with("c1", "alice", &[("p1", 2, 1000)]), retrieval)));
        let req = as_user(TestRequest::get().uri("/v1/api/cart/c1"), "alice");
        let (status, envelope) = call(mocks, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope.metadata, Some(json!({"message": message})));
        let data = envelope.data.unwrap();
        let cart = &data["cart"];
        assert_eq!(cart["_id"], "c1");
        assert_eq!(cart["userId"], "alice");
        assert_eq!(cart["totalQuantity"], 2);
        assert_eq!(cart["overallTotalPrice"], 20.0);
        assert_eq!(cart["items"][0]["productId"], "p1");
        assert_eq!(cart["items"][0]["unitPrice"], 10.0);
    }
}

#[actix_web::test]
async fn delete_cart() {
    let mut mocks = Mocks::default();
    mocks.cart_store.expect_delete_open_cart().times(1).returning(|_| Ok(CartId::from("c1")));
    let req = as_user(TestRequest::delete().uri("/v1/api/cart"), "alice");
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.data, Some(json!("Successfully removed cart.")));

    let mut mocks = Mocks::default();
    mocks.cart_store.expect_delete_open_cart().returning(|user| Err(LedgerError::NoOpenCart(user.clone())));
    let req = as_user(TestRequest::delete().uri("/v1/api/cart"), "alice");
    let (status, _) = call(mocks, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn reconcile_reports_before_and_after() {
    let mut mocks = Mocks::default();
    mocks.cart_store.expect_reconcile_open_cart().returning(|_| {
        Ok(Reconciliation {
            before: CartTotals { total_quantity: 3, overall_total_price: Money::from_units(30) },
            after: CartTotals { total_quantity: 2, overall_total_price: Money::from_units(20) },
        })
    });
    let req = as_user(TestRequest::post().uri("/v1/api/cart/reconcile"), "alice");
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::OK);
    let data = envelope.data.unwrap();
    assert_eq!(data["before"]["totalQuantity"], 3);
    assert_eq!(data["after"]["overallTotalPrice"], 20.0);
}

#[actix_web::test]
async fn database_failures_are_generic_server_errors() {
    let mut mocks = Mocks::default();
    mocks.cart_store.expect_delete_open_cart().returning(|_| Err(LedgerError::DatabaseError("database is locked".into())));
    let req = as_user(TestRequest::delete().uri("/v1/api/cart"), "alice");
    let (status, envelope) = call(mocks, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = envelope.error.unwrap();
    assert_eq!(error.message, "Something went wrong in our servers!");
    assert!(error.details.unwrap().as_str().unwrap().contains("database is locked"));
}
