use serde::{Deserialize, Serialize};

use super::LineItem;

/// Item id and quantity as handed to the durable order operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: i32,
    pub quantity: i32,
}

impl OrderLine {
    pub fn new(item_id: i32, quantity: i32) -> Self {
        Self { item_id, quantity }
    }
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            item_id: item.item_id,
            quantity: item.quantity,
        }
    }
}
