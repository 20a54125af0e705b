use cart_common::Money;
use serde::{de::Error, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db_types::ProductId;

/// The slice of a catalog product that the cart needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "price_from_number_or_string")]
    pub price: Money,
}

impl Product {
    pub fn new(id: ProductId, title: &str, price: Money) -> Self {
        Self { id, title: title.to_string(), price }
    }
}

/// Catalog backends render decimal columns either as JSON numbers or as strings.
fn price_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    let price = match Value::deserialize(deserializer)? {
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| D::Error::custom(format!("Invalid price: {n}")))?;
            Money::try_from(v).map_err(D::Error::custom)?
        },
        Value::String(s) => s.parse::<Money>().map_err(D::Error::custom)?,
        other => return Err(D::Error::custom(format!("Invalid price: {other}"))),
    };
    if price.is_negative() {
        return Err(D::Error::custom(format!("Negative price: {price}")));
    }
    Ok(price)
}
