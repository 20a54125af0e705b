use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use cart_engine::{
    cart_source::{AnyCartSource, CartSource, HttpCartSource, LedgerCartSource},
    catalog::{CatalogLookup, HttpCatalog},
    CartApi,
    CartManagement,
    OrderApi,
    OrderManagement,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        json_config,
        not_found,
        AddToCartRoute,
        CreateOrderRoute,
        DeleteCartRoute,
        GetCartRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        ReconcileCartRoute,
        RemoveFromCartRoute,
        UpdateCartRoute,
        UpdateOrderStatusRoute,
    },
};

pub type ServerCartSource = AnyCartSource<SqliteDatabase>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let catalog =
        HttpCatalog::new(config.catalog.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let cart_source = match &config.cart_service {
        Some(c) => AnyCartSource::Remote(
            HttpCartSource::new(c.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?,
        ),
        None => AnyCartSource::Ledger(LedgerCartSource::new(db.clone())),
    };
    let srv = create_server_instance(config, db, catalog, cart_source)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    catalog: HttpCatalog,
    cart_source: ServerCartSource,
) -> Result<Server, ServerError> {
    let cart_api = web::Data::new(CartApi::new(db.clone(), catalog));
    let order_api = web::Data::new(OrderApi::new(db, cart_source));
    info!("💻️ Listening on {}:{}", config.host, config.port);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cart_server::access_log"))
            .app_data(cart_api.clone())
            .app_data(order_api.clone())
            .app_data(json_config())
            .service(health)
            .service(
                web::scope("/v1/api")
                    .configure(configure_routes::<SqliteDatabase, HttpCatalog, SqliteDatabase, ServerCartSource>),
            )
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers the cart and order routes. The matching `CartApi<B, C>` and `OrderApi<O, S>` must be registered as app
/// data.
pub fn configure_routes<B, C, O, S>(cfg: &mut web::ServiceConfig)
where
    B: CartManagement + 'static,
    C: CatalogLookup + 'static,
    O: OrderManagement + 'static,
    S: CartSource + 'static,
{
    cfg.service(AddToCartRoute::<B, C>::new())
        .service(UpdateCartRoute::<B, C>::new())
        .service(ReconcileCartRoute::<B, C>::new())
        .service(DeleteCartRoute::<B, C>::new())
        .service(RemoveFromCartRoute::<B, C>::new())
        .service(GetCartRoute::<B, C>::new())
        .service(CreateOrderRoute::<O, S>::new())
        // Must come before `/orders/{order_id}`
        .service(MyOrdersRoute::<O, S>::new())
        .service(OrderByIdRoute::<O, S>::new())
        .service(UpdateOrderStatusRoute::<O, S>::new());
}
