use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{discounted_order, order};

/// One row of the order listing, with items flattened to "name (xqty)".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub bill_number: i32,
    pub kot: i32,
    pub date: NaiveDate,
    pub cashier_id: i32,
    pub price: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub tax: Decimal,
    pub items: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldOrderSummary {
    pub held_id: i32,
    pub cashier_id: i32,
    pub date: NaiveDate,
    pub price: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub tax: Decimal,
    pub items: String,
}

/// A stored line with the current catalog name and unit cost joined in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub item_id: i32,
    pub name: String,
    pub unit_cost: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: order::Model,
    pub items: Vec<OrderItemDetail>,
    pub discount: Option<discounted_order::Model>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountedOrderSummary {
    pub bill_number: i32,
    pub date: NaiveDate,
    pub initial_price: Decimal,
    pub discount_percentage: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

/// An archived order with the reason it was removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedOrderSummary {
    pub bill_number: i32,
    pub kot: i32,
    pub date: NaiveDate,
    pub cashier_id: i32,
    pub price: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub tax: Decimal,
    pub reason: String,
    pub deleted_at: DateTime<Utc>,
    pub items: String,
}

/// Joins `(name, quantity)` pairs the way order listings show them.
pub fn item_summary<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    items
        .into_iter()
        .map(|(name, quantity)| format!("{} (x{})", name, quantity))
        .collect::<Vec<_>>()
        .join(", ")
}
