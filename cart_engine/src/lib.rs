//! Cart Engine
//!
//! The transactional core of the cart service. It keeps every user's shopping cart consistent under concurrent
//! edits and turns carts into orders exactly once.
//!
//! The library is divided into three main sections:
//! 1. The ledger ([`mod@db`]): the storage traits and their SQLite backend. Every cart mutation is a single
//!    transaction that writes the line item and moves the cart totals together. You should never need to access the
//!    database directly. The exception is the data types used in the database, which are defined in [`db_types`].
//! 2. Collaborators: the product [`catalog`] that prices cart lines, and the [`cart_source`] that the order flow reads
//!    carts from.
//! 3. The public API ([`CartApi`] and [`OrderApi`]), which validates requests, consults the collaborators and drives
//!    the ledger.
mod api;
mod db;

pub mod cart_source;
pub mod catalog;
pub mod db_types;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    cart_api::{CartApi, MAX_LINE_QUANTITY},
    errors::{CartApiError, OrderApiError},
    order_api::OrderApi,
};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{CartManagement, InsertOrderResult, LedgerError, OrderManagement};
