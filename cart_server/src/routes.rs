//! Request handler definitions
//!
//! Define each route and its handler here. Handlers only translate between HTTP and the engine APIs; the rules about
//! carts and orders live in `cart_engine`.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every database and upstream call is therefore awaited, never
//! blocked on.
use actix_web::{
    error::JsonPayloadError,
    get,
    http::StatusCode,
    web,
    HttpRequest,
    HttpResponse,
    Responder,
};
use cart_engine::{
    cart_source::CartSource,
    catalog::CatalogLookup,
    db_types::{CartId, CartRetrieval, OrderId, ProductId},
    CartApi,
    CartManagement,
    OrderApi,
    OrderManagement,
};
use log::*;
use serde_json::json;

use crate::{
    auth::AuthenticatedUser,
    data_objects::{AddToCartRequest, CreateOrderRequest, MessageMetadata, UpdateQuantityRequest, UpdateStatusRequest},
    envelope::Envelope,
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// JSON body handling shared by every route. Bodies that are not JSON are refused with a 415, and bodies that do not
/// parse are refused with a 400. Both are rendered as envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        debug!("💻️ Rejected the body of {} {}. {err}", req.method(), req.path());
        match err {
            JsonPayloadError::ContentType => ServerError::UnsupportedMediaType(err.to_string()).into(),
            err => ServerError::InvalidRequestBody(err.to_string()).into(),
        }
    })
}

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    Err(ServerError::NoRecordFound(format!("Route {} not found.", req.path())))
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    Envelope::success(StatusCode::OK, "👍️").into_response()
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(add_to_cart => Post "/cart/add" impl CartManagement, CatalogLookup);
/// Adds one unit of `productId` to the caller's open cart, opening a new cart if they have none.
pub async fn add_to_cart<B: CartManagement, C: CatalogLookup>(
    user: AuthenticatedUser,
    body: web::Json<AddToCartRequest>,
    api: web::Data<CartApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST add_to_cart for {}", user.user_id);
    let product_id = ProductId::from(body.into_inner().product_id);
    api.add_product_to_cart(&user.user_id, &product_id).await?;
    Ok(Envelope::success(StatusCode::CREATED, "Successfully added product.").into_response())
}

route!(update_cart => Put "/cart/update" impl CartManagement, CatalogLookup);
pub async fn update_cart<B: CartManagement, C: CatalogLookup>(
    user: AuthenticatedUser,
    body: web::Json<UpdateQuantityRequest>,
    api: web::Data<CartApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ PUT update_cart for {}", user.user_id);
    let UpdateQuantityRequest { product_id, new_quantity } = body.into_inner();
    let new_quantity =
        new_quantity.ok_or_else(|| ServerError::InvalidInput("Missing newQuantity field.".into()))?;
    api.update_cart_item_quantity(&user.user_id, &ProductId::from(product_id), new_quantity).await?;
    Ok(Envelope::success(StatusCode::OK, "Cart updated").into_response())
}

route!(remove_from_cart => Delete "/cart/{product_id}" impl CartManagement, CatalogLookup);
pub async fn remove_from_cart<B: CartManagement, C: CatalogLookup>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    api: web::Data<CartApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = ProductId::from(path.into_inner());
    debug!("💻️ DELETE remove_from_cart {product_id} for {}", user.user_id);
    api.remove_cart_item(&user.user_id, &product_id).await?;
    Ok(Envelope::success(StatusCode::OK, "Product removed from cart").into_response())
}

route!(get_cart => Get "/cart/{cart_id}" impl CartManagement, CatalogLookup);
/// Returns the caller's open cart. If the caller has no open cart, an empty one is created and returned, and the
/// metadata says so.
pub async fn get_cart<B: CartManagement, C: CatalogLookup>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    api: web::Data<CartApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    let cart_id = CartId::from(path.into_inner());
    debug!("💻️ GET get_cart {cart_id} for {}", user.user_id);
    let (cart, retrieval) = api.retrieve_cart(&user.user_id, &cart_id).await?;
    let message = match retrieval {
        CartRetrieval::Created => "No cart found. New empty cart created.",
        CartRetrieval::Retrieved => "Cart successfully retrieved.",
    };
    let envelope = Envelope::success(StatusCode::OK, json!({ "cart": cart }))
        .with_metadata(MessageMetadata::new(message));
    Ok(envelope.into_response())
}

route!(delete_cart => Delete "/cart" impl CartManagement, CatalogLookup);
pub async fn delete_cart<B: CartManagement, C: CatalogLookup>(
    user: AuthenticatedUser,
    api: web::Data<CartApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ DELETE delete_cart for {}", user.user_id);
    api.delete_cart(&user.user_id).await?;
    Ok(Envelope::success(StatusCode::OK, "Successfully removed cart.").into_response())
}

route!(reconcile_cart => Post "/cart/reconcile" impl CartManagement, CatalogLookup);
/// Recomputes the caller's cart totals from its lines and reports the totals before and after.
pub async fn reconcile_cart<B: CartManagement, C: CatalogLookup>(
    user: AuthenticatedUser,
    api: web::Data<CartApi<B, C>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST reconcile_cart for {}", user.user_id);
    let result = api.reconcile_cart_totals(&user.user_id).await?;
    Ok(Envelope::success(StatusCode::OK, result).into_response())
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl OrderManagement, CartSource);
/// Places an order for the caller's cart.
///
/// The HTTP status is 200, while the envelope reports 202, matching what existing clients expect.
pub async fn create_order<B: OrderManagement, S: CartSource>(
    user: AuthenticatedUser,
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderApi<B, S>>,
) -> Result<HttpResponse, ServerError> {
    let cart_id = CartId::from(body.into_inner().cart_id);
    debug!("💻️ POST create_order for cart {cart_id} by {}", user.user_id);
    let order_id = api.create_order(&cart_id, &user.credentials()).await?;
    let data = json!({ "message": "Order successfully created.", "_id": order_id });
    Ok(Envelope::success(StatusCode::ACCEPTED, data).into_response_with_status(StatusCode::OK))
}

route!(my_orders => Get "/orders/user" impl OrderManagement, CartSource);
pub async fn my_orders<B: OrderManagement, S: CartSource>(
    user: AuthenticatedUser,
    api: web::Data<OrderApi<B, S>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for {}", user.user_id);
    let orders = api.find_all_orders_for_user(&user.user_id).await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "orders": orders })).into_response())
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement, CartSource);
/// Fetches one of the caller's orders. The order is wrapped in a list for compatibility with existing clients.
pub async fn order_by_id<B: OrderManagement, S: CartSource>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    api: web::Data<OrderApi<B, S>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::from(path.into_inner());
    debug!("💻️ GET order_by_id {order_id} for {}", user.user_id);
    let order = api.find_order_for_user(&order_id, &user.user_id).await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "order": [order] })).into_response())
}

route!(update_order_status => Patch "/orders/{order_id}/status" impl OrderManagement, CartSource);
pub async fn update_order_status<B: OrderManagement, S: CartSource>(
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
    api: web::Data<OrderApi<B, S>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::from(path.into_inner());
    let new_status = body.into_inner().new_status;
    debug!("💻️ PATCH update_order_status {order_id} -> {new_status} by {}", user.user_id);
    let order = api.update_order_status(&order_id, &new_status).await?;
    let envelope = Envelope::success(StatusCode::OK, json!({ "order": order }))
        .with_metadata(MessageMetadata::new("Order updated successfully."));
    Ok(envelope.into_response())
}
