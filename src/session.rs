//! One terminal's working state: the live bill and the commands a cashier issues against it.

use crate::{
    entities::{held_order, order},
    errors::ServiceError,
    models::{DiscountOutcome, DiscountSpec, OrderLine},
    services::{
        Bill, CatalogLookup, CommitOrderInput, HeldOrderService, HoldBillInput, OrderService,
    },
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Owns the bill being composed at one terminal.
///
/// Durable commands (commit, hold, merge) clear the bill only when they
/// succeed; a failed command leaves it as it was.
pub struct PosSession {
    cashier_id: i32,
    bill: Bill,
    catalog: Arc<dyn CatalogLookup>,
    orders: Arc<OrderService>,
    held_orders: Arc<HeldOrderService>,
}

impl PosSession {
    pub fn new(
        cashier_id: i32,
        catalog: Arc<dyn CatalogLookup>,
        orders: Arc<OrderService>,
        held_orders: Arc<HeldOrderService>,
    ) -> Self {
        Self {
            cashier_id,
            bill: Bill::new(),
            catalog,
            orders,
            held_orders,
        }
    }

    pub fn cashier_id(&self) -> i32 {
        self.cashier_id
    }

    pub fn bill(&self) -> &Bill {
        &self.bill
    }

    pub fn add_item(
        &mut self,
        item_id: i32,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        self.bill.add_item(item_id, name, unit_price, quantity)
    }

    /// Adds an item using its catalog name and listed cost.
    pub async fn add_menu_item(&mut self, item_id: i32, quantity: i32) -> Result<(), ServiceError> {
        let entry = self
            .catalog
            .lookup(item_id)
            .await?
            .ok_or(ServiceError::UnknownItem(item_id))?;
        self.bill.add_item(item_id, entry.name, entry.cost, quantity)
    }

    pub fn set_quantity(&mut self, item_id: i32, quantity: i64) {
        self.bill.set_quantity(item_id, quantity);
    }

    pub fn set_quantity_input(&mut self, item_id: i32, input: &str) {
        self.bill.set_quantity_input(item_id, input);
    }

    pub fn remove_item(&mut self, item_id: i32) {
        self.bill.remove_item(item_id);
    }

    pub fn clear_bill(&mut self) {
        self.bill.clear();
    }

    pub fn apply_discount(&mut self, spec: DiscountSpec) -> Result<DiscountOutcome, ServiceError> {
        self.bill.apply_discount(&spec).map_err(|e| {
            warn!(error = %e, "Discount rejected");
            e
        })
    }

    /// Commits the bill, charging the discounted total when a discount is pending.
    #[instrument(skip(self), fields(cashier_id = self.cashier_id))]
    pub async fn commit_bill(&mut self, date: NaiveDate) -> Result<order::Model, ServiceError> {
        let input = CommitOrderInput {
            cashier_id: self.cashier_id,
            date,
            lines: self.bill.order_lines(),
            final_total: self.bill.discount().map(|d| d.discounted_total),
        };

        let order = self.orders.commit(input).await?;
        self.bill.clear();
        Ok(order)
    }

    #[instrument(skip(self), fields(cashier_id = self.cashier_id))]
    pub async fn hold_bill(&mut self, date: NaiveDate) -> Result<held_order::Model, ServiceError> {
        let input = HoldBillInput {
            cashier_id: self.cashier_id,
            date,
            lines: self.bill.order_lines(),
        };

        let held = self.held_orders.hold(input).await?;
        self.bill.clear();
        Ok(held)
    }

    /// Consumes a held order and adds its lines to the live bill.
    ///
    /// The lines are merged into a copy of the bill first, so a line that
    /// cannot be merged leaves both the bill and the held order as they were.
    #[instrument(skip(self))]
    pub async fn resume_held(&mut self, held_id: i32) -> Result<(), ServiceError> {
        let lines = self.held_orders.lines(held_id).await?;

        let mut merged = self.bill.clone();
        for line in &lines {
            debug!(item_id = line.item_id, quantity = line.quantity, "Replaying held line");
            merged.add_item(line.item_id, line.name.clone(), line.unit_price, line.quantity)?;
        }

        self.held_orders.resume(held_id).await?;
        self.bill = merged;
        Ok(())
    }

    pub async fn delete_held(&mut self, held_id: i32) -> Result<(), ServiceError> {
        self.held_orders.delete(held_id).await
    }

    /// Adds the bill's lines to an already committed order.
    #[instrument(skip(self))]
    pub async fn merge_into_order(&mut self, bill_number: i32) -> Result<order::Model, ServiceError> {
        let lines = self.bill.order_lines();
        let order = self.orders.merge_into(bill_number, &lines).await?;
        self.bill.clear();
        Ok(order)
    }

    /// Replaces a committed order's lines. The live bill is not involved.
    pub async fn edit_order(
        &self,
        bill_number: Option<i32>,
        items: &[OrderLine],
    ) -> Result<order::Model, ServiceError> {
        self.orders.replace(bill_number, items).await
    }
}
