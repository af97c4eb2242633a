use crate::{
    errors::ServiceError,
    models::{DiscountOutcome, DiscountSpec, LineItem, OrderLine},
    services::discount,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// The bill currently being composed at a terminal.
///
/// Holds at most one line per item id, in insertion order, plus the
/// discount applied to the current contents. Every change to the lines
/// drops that discount.
#[derive(Clone, Debug, Default)]
pub struct Bill {
    lines: Vec<LineItem>,
    discount: Option<DiscountOutcome>,
}

impl Bill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of an item, merging with an existing line for the same id.
    ///
    /// An existing line keeps its unit price; only the quantity grows.
    pub fn add_item(
        &mut self,
        item_id: i32,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        if quantity <= 0 {
            warn!(item_id, quantity, "Rejected non-positive quantity");
            return Err(ServiceError::InvalidQuantity {
                item_id,
                quantity: i64::from(quantity),
            });
        }

        match self.position(item_id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity =
                    line.quantity
                        .checked_add(quantity)
                        .ok_or(ServiceError::InvalidQuantity {
                            item_id,
                            quantity: i64::from(line.quantity) + i64::from(quantity),
                        })?;
            }
            None => self.lines.push(LineItem {
                item_id,
                name: name.into(),
                unit_price,
                quantity,
            }),
        }

        self.discount = None;
        debug!(item_id, quantity, subtotal = %self.subtotal(), "Item added to bill");
        Ok(())
    }

    /// Sets a line's quantity, clamping anything below 1 up to 1.
    /// Does nothing if the item is not on the bill.
    pub fn set_quantity(&mut self, item_id: i32, quantity: i64) {
        let Some(idx) = self.position(item_id) else {
            return;
        };
        let clamped = quantity.clamp(1, i64::from(i32::MAX));
        self.lines[idx].quantity = i32::try_from(clamped).unwrap_or(i32::MAX);
        self.discount = None;
    }

    /// Sets a line's quantity from raw text input. Anything that does not parse
    /// as an integer counts as 1.
    pub fn set_quantity_input(&mut self, item_id: i32, input: &str) {
        let quantity = input.trim().parse::<i64>().unwrap_or(1);
        self.set_quantity(item_id, quantity);
    }

    pub fn remove_item(&mut self, item_id: i32) {
        if let Some(idx) = self.position(item_id) {
            self.lines.remove(idx);
            self.discount = None;
        }
    }

    /// Empties the bill and forgets any discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = None;
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Computes `spec` against the undiscounted subtotal and keeps the result.
    /// A rejected discount also drops the earlier one.
    pub fn apply_discount(&mut self, spec: &DiscountSpec) -> Result<DiscountOutcome, ServiceError> {
        self.discount = None;
        let outcome = discount::apply(self.subtotal(), spec)?;
        self.discount = Some(outcome);
        Ok(outcome)
    }

    pub fn discount(&self) -> Option<&DiscountOutcome> {
        self.discount.as_ref()
    }

    /// The amount to charge: the discounted total if a discount applies, else the subtotal.
    pub fn total(&self) -> Decimal {
        self.discount
            .map(|d| d.discounted_total)
            .unwrap_or_else(|| self.subtotal())
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, item_id: i32) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines.iter().map(OrderLine::from).collect()
    }

    fn position(&self, item_id: i32) -> Option<usize> {
        self.lines.iter().position(|l| l.item_id == item_id)
    }
}
