use actix_web::{
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
};
use cart_engine::{
    cart_source::{AnyCartSource, LedgerCartSource},
    db_types::Money,
    test_utils::{prepare_env::prepare_test_env, price_list::PriceList},
    CartApi,
    OrderApi,
    SqliteDatabase,
};
use serde_json::json;

use super::helpers::{as_user, call, Mocks};
use crate::{
    envelope::Envelope,
    routes::{json_config, not_found},
    server::configure_routes,
};

#[actix_web::test]
async fn health() {
    let (status, envelope) = call(Mocks::default(), TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(envelope.success);
}

#[actix_web::test]
async fn unknown_routes_get_an_envelope() {
    let req = as_user(TestRequest::get().uri("/v1/api/wishlist"), "alice");
    let (status, envelope) = call(Mocks::default(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!envelope.success);
    assert_eq!(envelope.error.unwrap().code, 404);
}

type LedgerSource = AnyCartSource<SqliteDatabase>;

async fn send<S, R>(service: &S, req: R) -> (StatusCode, Envelope)
where S: Service<R, Response = ServiceResponse, Error = actix_web::Error> {
    let res = test::call_service(service, req).await;
    let status = res.status();
    let envelope = test::read_body_json(res).await;
    (status, envelope)
}

#[actix_web::test]
async fn shopping_against_a_real_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("carts.db").display());
    let db = prepare_test_env(&url, 5).await;
    let prices = PriceList::new().with_price("p1", Money::from_units(10)).with_price("p2", Money::from_cents(450));
    let cart_api = web::Data::new(CartApi::new(db.clone(), prices));
    let order_api = web::Data::new(OrderApi::new(db.clone(), AnyCartSource::Ledger(LedgerCartSource::new(db))));
    let app = App::new()
        .app_data(cart_api)
        .app_data(order_api)
        .app_data(json_config())
        .service(
            web::scope("/v1/api")
                .configure(configure_routes::<SqliteDatabase, PriceList, SqliteDatabase, LedgerSource>),
        )
        .default_service(web::to(not_found));
    let service = test::init_service(app).await;

    for product in ["p1", "p1", "p2"] {
        let req = as_user(TestRequest::post().uri("/v1/api/cart/add"), "alice").set_json(json!({"productId": product}));
        let (status, _) = send(&service, req.to_request()).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let req = as_user(TestRequest::get().uri("/v1/api/cart/current"), "alice");
    let (status, envelope) = send(&service, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.metadata, Some(json!({"message": "Cart successfully retrieved."})));
    let data = envelope.data.unwrap();
    let cart = &data["cart"];
    assert_eq!(cart["totalQuantity"], 3);
    assert_eq!(cart["overallTotalPrice"], 24.5);
    let cart_id = cart["_id"].as_str().unwrap().to_string();

    let req = as_user(TestRequest::post().uri("/v1/api/orders"), "bob").set_json(json!({"cartId": cart_id}));
    let (status, _) = send(&service, req.to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = as_user(TestRequest::post().uri("/v1/api/orders"), "alice").set_json(json!({"cartId": cart_id}));
    let (status, envelope) = send(&service, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.status_code, 202);
    let order_id = envelope.data.unwrap()["_id"].as_str().unwrap().to_string();

    let req = as_user(TestRequest::post().uri("/v1/api/orders"), "alice").set_json(json!({"cartId": cart_id}));
    let (status, _) = send(&service, req.to_request()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let req = as_user(TestRequest::get().uri("/v1/api/orders/user"), "alice");
    let (status, envelope) = send(&service, req.to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope.data.unwrap()["orders"][0]["_id"], order_id.as_str());

    // The ordered cart is closed, so the next read opens a new one
    let req = as_user(TestRequest::get().uri(&format!("/v1/api/cart/{cart_id}")), "alice");
    let (_, envelope) = send(&service, req.to_request()).await;
    assert_eq!(envelope.metadata, Some(json!({"message": "No cart found. New empty cart created."})));
    assert_ne!(envelope.data.unwrap()["cart"]["_id"], cart_id.as_str());
}
