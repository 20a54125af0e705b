pub mod cart_api;
pub mod errors;
pub mod order_api;
