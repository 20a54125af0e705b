use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Utc};
pub use cart_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// Declares a string-backed identifier that maps transparently onto a `TEXT` column.
macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl FromStr for $name {
            type Err = ();
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(UserId);
string_id!(ProductId);
string_id!(CartId);
string_id!(CartItemId);
string_id!(OrderId);

impl CartId {
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl CartItemId {
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl OrderId {
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

//--------------------------------------          Cart          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[sqlx(rename = "_id")]
    #[serde(rename = "_id")]
    pub id: CartId,
    pub user_id: UserId,
    pub total_quantity: i64,
    pub overall_total_price: Money,
    #[serde(default)]
    pub closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------        CartItem        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[sqlx(rename = "_id")]
    #[serde(rename = "_id")]
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// The catalog price per unit at the time the line was last written
    pub unit_price: Money,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      CartWithItems     ---------------------------------------------------------
/// A cart header together with its line items. Serializes as a flat cart object carrying an `items` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartWithItems {
    #[serde(flatten)]
    pub cart: Cart,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartWithItems {
    pub fn id(&self) -> &CartId {
        &self.cart.id
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The totals as recomputed from the line items, ignoring the stored header values.
    pub fn item_totals(&self) -> CartTotals {
        let total_quantity = self.items.iter().map(|i| i.quantity).sum();
        let overall_total_price = self.items.iter().map(|i| i.total_price).sum();
        CartTotals { total_quantity, overall_total_price }
    }

    pub fn stored_totals(&self) -> CartTotals {
        CartTotals { total_quantity: self.cart.total_quantity, overall_total_price: self.cart.overall_total_price }
    }

    pub fn totals_are_consistent(&self) -> bool {
        self.item_totals() == self.stored_totals()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_quantity: i64,
    pub overall_total_price: Money,
}

/// The outcome of recomputing a cart's totals from its line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub before: CartTotals,
    pub after: CartTotals,
}

impl Reconciliation {
    pub fn drift_corrected(&self) -> bool {
        self.before != self.after
    }
}

/// A summary of a single committed cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    pub cart_id: CartId,
    pub product_id: ProductId,
    /// The line as it stands after the mutation. `None` if the line was removed.
    pub item: Option<CartItem>,
    pub quantity_delta: i64,
    pub price_delta: Money,
    /// True if the mutation had to open a new cart for the user
    pub cart_created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRetrieval {
    /// The cart already existed and was returned as-is
    Retrieved,
    /// No open cart existed, so an empty one was created
    Created,
}

//--------------------------------------     OrderStatusType     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been placed and awaits fulfilment
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(pub String);

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatusType::Pending => "pending",
            OrderStatusType::Shipped => "shipped",
            OrderStatusType::Delivered => "delivered",
            OrderStatusType::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderStatusType {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

impl OrderStatusType {
    /// The statuses an order must currently be in to move to `self`.
    pub fn allowed_predecessors(&self) -> &'static [OrderStatusType] {
        use OrderStatusType::*;
        match self {
            Pending => &[],
            Shipped => &[Pending],
            Delivered => &[Shipped],
            Cancelled => &[Pending, Shipped],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatusType) -> bool {
        next.allowed_predecessors().contains(self)
    }
}

//--------------------------------------          Order          --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[sqlx(rename = "_id")]
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub cart_id: CartId,
    pub user_id: UserId,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------        NewOrder         --------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub cart_id: CartId,
    pub user_id: UserId,
    pub status: OrderStatusType,
}

impl NewOrder {
    pub fn new(cart_id: CartId, user_id: UserId) -> Self {
        Self { id: OrderId::random(), cart_id, user_id, status: OrderStatusType::Pending }
    }
}
