//! # Ledger backends
//!
//! This module defines the contracts that a storage backend must honour to act as the cart and order ledger.
//!
//! ## Carts
//! A user has at most one *open* cart at a time. Every cart mutation runs as a single atomic unit: the line item
//! write and the matching adjustment to the cart's running totals either both commit or neither does. After every
//! committed mutation, a cart's `total_quantity` equals the sum of its line quantities, and its
//! `overall_total_price` equals the sum of its line totals.
//!
//! ## Orders
//! An order is created from a cart at most once. Placing an order closes the cart in the same unit of work, so the
//! user's next cart mutation opens a fresh cart.
//!
//! * [`CartManagement`] defines cart mutations and reads.
//! * [`OrderManagement`] defines order creation, lookup and status changes.
mod cart_management;
mod data_objects;
mod errors;
mod order_management;

pub use cart_management::CartManagement;
pub use data_objects::InsertOrderResult;
pub use errors::LedgerError;
pub use order_management::OrderManagement;
