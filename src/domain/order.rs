use serde::{Deserialize, Serialize};

/// An order as the order service reports it.
///
/// `id` and `status` are assigned by the backend and stay `None` on anything the
/// client builds locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub product: String,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Order {
    pub fn new(id: i64, product: impl Into<String>, quantity: i32, status: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            product: product.into(),
            quantity,
            status: Some(status.into()),
        }
    }
}

/// Payload for creating a new order. Serialized as the `POST /orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub product: String,
    pub quantity: i32,
}

impl OrderDraft {
    pub fn new(product: impl Into<String>, quantity: i32) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}
