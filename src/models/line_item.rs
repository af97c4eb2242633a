use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the bill being composed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: i32,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
