//! # Cart server
//! The HTTP front end of the cart engine. It is responsible for:
//! Identifying the caller from the headers set by the gateway.
//! Translating requests into calls on the cart and order APIs.
//! Rendering every result, success or failure, in the common response envelope.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/v1/api/cart/...`: Adding, updating, removing and reading the caller's cart.
//! * `/v1/api/orders/...`: Placing orders and following their status.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod envelope;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
