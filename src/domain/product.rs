use serde::{Deserialize, Serialize};

/// Represents a product in the inventory. The client only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub stock_quantity: i32,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, stock_quantity: i32) -> Self {
        Self {
            id,
            name: name.into(),
            stock_quantity,
        }
    }
}
