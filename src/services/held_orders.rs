use crate::{
    db::DbPool,
    entities::{
        held_order::{self, Entity as HeldOrderEntity},
        held_order_item::{self, Entity as HeldOrderItemEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{summary::item_summary, HeldOrderSummary, LineItem, OrderLine},
    services::{catalog::CatalogLookup, pricing::prepare_lines},
};
use chrono::NaiveDate;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HoldBillInput {
    pub cashier_id: i32,
    pub date: NaiveDate,
    pub lines: Vec<OrderLine>,
}

/// Bills parked mid-service. A held order is consumed whole by `resume`
/// and can be resumed at most once.
#[derive(Clone)]
pub struct HeldOrderService {
    db: Arc<DbPool>,
    catalog: Arc<dyn CatalogLookup>,
    event_sender: Arc<EventSender>,
}

impl HeldOrderService {
    pub fn new(
        db: Arc<DbPool>,
        catalog: Arc<dyn CatalogLookup>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            db,
            catalog,
            event_sender,
        }
    }

    #[instrument(skip(self, input), fields(cashier_id = input.cashier_id, lines = input.lines.len()))]
    pub async fn hold(&self, input: HoldBillInput) -> Result<held_order::Model, ServiceError> {
        let priced = prepare_lines(self.catalog.as_ref(), &input.lines).await?;
        let totals = priced.totals.rounded();

        let txn = self.db.begin().await?;

        let held = held_order::ActiveModel {
            cashier_id: Set(input.cashier_id),
            date: Set(input.date),
            price: Set(totals.price),
            sgst: Set(totals.sgst),
            cgst: Set(totals.cgst),
            tax: Set(totals.tax),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let items = priced.lines.iter().map(|line| held_order_item::ActiveModel {
            held_id: Set(held.held_id),
            item_id: Set(line.entry.item_id),
            quantity: Set(line.quantity),
            ..Default::default()
        });
        HeldOrderItemEntity::insert_many(items).exec(&txn).await?;

        txn.commit().await?;

        counter!("counter_pos_held_orders.held", 1);
        info!(held_id = held.held_id, price = %held.price, "Bill held");
        self.event_sender.send_or_log(Event::BillHeld(held.held_id));

        Ok(held)
    }

    /// Held orders, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<HeldOrderSummary>, ServiceError> {
        let held = HeldOrderEntity::find()
            .order_by_desc(held_order::Column::HeldId)
            .all(&*self.db)
            .await?;

        let ids: Vec<i32> = held.iter().map(|h| h.held_id).collect();
        let mut by_held: HashMap<i32, Vec<held_order_item::Model>> = HashMap::new();
        for item in HeldOrderItemEntity::find()
            .filter(held_order_item::Column::HeldId.is_in(ids))
            .order_by_asc(held_order_item::Column::Id)
            .all(&*self.db)
            .await?
        {
            by_held.entry(item.held_id).or_default().push(item);
        }

        let mut summaries = Vec::with_capacity(held.len());
        for order in held {
            let mut described = Vec::new();
            for item in by_held.remove(&order.held_id).unwrap_or_default() {
                let name = match self.catalog.lookup(item.item_id).await? {
                    Some(entry) => entry.name,
                    None => format!("Item #{}", item.item_id),
                };
                described.push((name, item.quantity));
            }

            summaries.push(HeldOrderSummary {
                held_id: order.held_id,
                cashier_id: order.cashier_id,
                date: order.date,
                price: order.price,
                sgst: order.sgst,
                cgst: order.cgst,
                tax: order.tax,
                items: item_summary(described.iter().map(|(n, q)| (n.as_str(), *q))),
            });
        }

        Ok(summaries)
    }

    /// The held lines with current catalog names and prices. The held order
    /// is left in place.
    ///
    /// Fails with `UnknownItem` if any item has left the catalog.
    #[instrument(skip(self))]
    pub async fn lines(&self, held_id: i32) -> Result<Vec<LineItem>, ServiceError> {
        let held = HeldOrderEntity::find_by_id(held_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!(held_id, "Held order not found");
                ServiceError::HeldOrderNotFound(held_id)
            })?;

        let items = HeldOrderItemEntity::find()
            .filter(held_order_item::Column::HeldId.eq(held.held_id))
            .order_by_asc(held_order_item::Column::Id)
            .all(&*self.db)
            .await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let entry = self
                .catalog
                .lookup(item.item_id)
                .await?
                .ok_or(ServiceError::UnknownItem(item.item_id))?;
            lines.push(LineItem {
                item_id: entry.item_id,
                name: entry.name,
                unit_price: entry.cost,
                quantity: item.quantity,
            });
        }

        Ok(lines)
    }

    /// Returns the held lines (see [`HeldOrderService::lines`]) and deletes
    /// the held order.
    ///
    /// If any item has left the catalog the held order is kept and
    /// `UnknownItem` is returned.
    #[instrument(skip(self))]
    pub async fn resume(&self, held_id: i32) -> Result<Vec<LineItem>, ServiceError> {
        let lines = self.lines(held_id).await?;

        let txn = self.db.begin().await?;
        remove_held(&txn, held_id).await?;
        txn.commit().await?;

        counter!("counter_pos_held_orders.resumed", 1);
        info!(held_id, lines = lines.len(), "Held order resumed");
        self.event_sender.send_or_log(Event::HeldOrderResumed(held_id));

        Ok(lines)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, held_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        remove_held(&txn, held_id).await?;
        txn.commit().await?;

        counter!("counter_pos_held_orders.deleted", 1);
        info!(held_id, "Held order deleted");
        self.event_sender.send_or_log(Event::HeldOrderDeleted(held_id));

        Ok(())
    }
}

/// Deletes the lines and then the header. A missing header means another
/// caller already consumed it; the transaction is dropped and rolls back.
async fn remove_held(txn: &DatabaseTransaction, held_id: i32) -> Result<(), ServiceError> {
    HeldOrderItemEntity::delete_many()
        .filter(held_order_item::Column::HeldId.eq(held_id))
        .exec(txn)
        .await?;

    let removed = HeldOrderEntity::delete_by_id(held_id).exec(txn).await?;
    if removed.rows_affected == 0 {
        warn!(held_id, "Held order not found");
        return Err(ServiceError::HeldOrderNotFound(held_id));
    }

    Ok(())
}
