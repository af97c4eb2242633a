use crate::{
    db::DbPool,
    entities::{
        deleted_order, deleted_order_item,
        discounted_order::{self, Entity as DiscountedOrderEntity},
        order::{self, Entity as OrderEntity},
        order_item::{self, Entity as OrderItemEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        round_money, summary::item_summary, DeletedOrderSummary, DiscountedOrderSummary,
        OrderDetails, OrderItemDetail, OrderLine, OrderSummary,
    },
    services::{
        catalog::CatalogLookup,
        pricing::{prepare_lines, PricedBill},
        receipt::{self, ReceiptPayload},
    },
};
use chrono::NaiveDate;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Input for committing a finished bill.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitOrderInput {
    pub cashier_id: i32,
    pub date: NaiveDate,
    pub lines: Vec<OrderLine>,
    /// Amount actually charged, typically the discounted total. Ignored unless positive.
    #[serde(default)]
    pub final_total: Option<Decimal>,
}

/// Order persistence: commit, merge, edit, deletion and the read side.
///
/// All multi-row writes run in a single transaction. Catalog lookups happen
/// before the transaction starts, so an unknown item never leaves a write behind.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    catalog: Arc<dyn CatalogLookup>,
    event_sender: Arc<EventSender>,
    kot_lock: Arc<Mutex<()>>,
}

impl OrderService {
    pub fn new(
        db: Arc<DbPool>,
        catalog: Arc<dyn CatalogLookup>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            db,
            catalog,
            event_sender,
            kot_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Commits a bill as a new order with the next kot for its date.
    ///
    /// Price is the positive `final_total` if given, else the listed total.
    /// Taxes always come from the listed costs. When the listed total exceeds
    /// the price, a discount record is written alongside the order.
    #[instrument(skip(self, input), fields(cashier_id = input.cashier_id, date = %input.date, lines = input.lines.len()))]
    pub async fn commit(&self, input: CommitOrderInput) -> Result<order::Model, ServiceError> {
        let priced = prepare_lines(self.catalog.as_ref(), &input.lines).await?;
        let totals = priced.totals.rounded();
        let price = match input.final_total {
            Some(total) if total > Decimal::ZERO => round_money(total),
            Some(total) => {
                warn!(
                    final_total = %total,
                    listed_total = %totals.price,
                    "Non-positive final total ignored; charging the listed total"
                );
                totals.price
            }
            None => totals.price,
        };

        // kot is read and written under the lock, inside one transaction
        let kot_guard = self.kot_lock.lock().await;
        let txn = self.db.begin().await?;

        let kot = next_kot(&txn, input.date).await?;

        let header = order::ActiveModel {
            kot: Set(kot),
            date: Set(input.date),
            cashier_id: Set(input.cashier_id),
            price: Set(price),
            sgst: Set(totals.sgst),
            cgst: Set(totals.cgst),
            tax: Set(totals.tax),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, kot, "Failed to insert order header");
            ServiceError::DatabaseError(e)
        })?;

        insert_order_items(&txn, header.bill_number, &priced).await?;

        if totals.price > price {
            let discount_amount = totals.price - price;
            discounted_order::ActiveModel {
                bill_number: Set(header.bill_number),
                initial_price: Set(totals.price),
                discount_percentage: Set(discount_percentage(discount_amount, totals.price)),
                discount_amount: Set(discount_amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, bill_number = header.bill_number, "Failed to commit order");
            ServiceError::DatabaseError(e)
        })?;
        drop(kot_guard);

        counter!("counter_pos_orders.committed", 1);
        info!(
            bill_number = header.bill_number,
            kot = header.kot,
            price = %header.price,
            "Order committed"
        );

        self.event_sender.send_or_log(Event::OrderCommitted {
            bill_number: header.bill_number,
            kot: header.kot,
            date: header.date,
            price: header.price,
        });

        Ok(header)
    }

    /// Folds new lines into an existing order.
    ///
    /// Quantities of items already on the order are incremented. The listed
    /// price and taxes of the new lines are added to the stored totals, so
    /// merging the same lines twice adds them twice. A discount record, if
    /// present, grows by the same price delta.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn merge_into(
        &self,
        bill_number: i32,
        lines: &[OrderLine],
    ) -> Result<order::Model, ServiceError> {
        let priced = prepare_lines(self.catalog.as_ref(), lines).await?;
        let delta = priced.totals.rounded();

        let txn = self.db.begin().await?;

        let existing = find_order(&txn, bill_number).await?;

        for line in &priced.lines {
            let current = OrderItemEntity::find()
                .filter(order_item::Column::OrderId.eq(bill_number))
                .filter(order_item::Column::ItemId.eq(line.entry.item_id))
                .one(&txn)
                .await?;

            match current {
                Some(item) => {
                    let quantity = item.quantity.checked_add(line.quantity).ok_or(
                        ServiceError::InvalidQuantity {
                            item_id: item.item_id,
                            quantity: i64::from(item.quantity) + i64::from(line.quantity),
                        },
                    )?;
                    let mut item: order_item::ActiveModel = item.into();
                    item.quantity = Set(quantity);
                    item.update(&txn).await?;
                }
                None => {
                    order_item::ActiveModel {
                        order_id: Set(bill_number),
                        item_id: Set(line.entry.item_id),
                        quantity: Set(line.quantity),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }

        let new_price = existing.price + delta.price;
        let mut header: order::ActiveModel = existing.clone().into();
        header.price = Set(new_price);
        header.sgst = Set(existing.sgst + delta.sgst);
        header.cgst = Set(existing.cgst + delta.cgst);
        header.tax = Set(existing.tax + delta.tax);
        let updated = header.update(&txn).await?;

        if let Some(record) = DiscountedOrderEntity::find()
            .filter(discounted_order::Column::BillNumber.eq(bill_number))
            .one(&txn)
            .await?
        {
            let initial_price = record.initial_price + delta.price;
            let discount_amount = record.discount_amount;
            let mut record: discounted_order::ActiveModel = record.into();
            record.initial_price = Set(initial_price);
            record.discount_percentage = Set(discount_percentage(discount_amount, initial_price));
            record.update(&txn).await?;
        }

        txn.commit().await?;

        counter!("counter_pos_orders.merged", 1);
        info!(
            bill_number,
            price_delta = %delta.price,
            price = %updated.price,
            "Merged items into order"
        );

        self.event_sender.send_or_log(Event::OrderMerged {
            bill_number,
            price_delta: delta.price,
        });

        Ok(updated)
    }

    /// Replaces an order's lines and recomputes its totals from the listed
    /// costs of the new set. Running it twice with the same lines changes nothing
    /// the second time. Any discount record for the order is removed.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn replace(
        &self,
        bill_number: Option<i32>,
        lines: &[OrderLine],
    ) -> Result<order::Model, ServiceError> {
        let bill_number = bill_number.ok_or_else(|| {
            warn!("Edit requested without an order reference");
            ServiceError::NoOrderReference
        })?;

        let priced = prepare_lines(self.catalog.as_ref(), lines).await?;
        let totals = priced.totals.rounded();

        let txn = self.db.begin().await?;

        let existing = find_order(&txn, bill_number).await?;

        OrderItemEntity::delete_many()
            .filter(order_item::Column::OrderId.eq(bill_number))
            .exec(&txn)
            .await?;
        insert_order_items(&txn, bill_number, &priced).await?;

        DiscountedOrderEntity::delete_many()
            .filter(discounted_order::Column::BillNumber.eq(bill_number))
            .exec(&txn)
            .await?;

        let mut header: order::ActiveModel = existing.into();
        header.price = Set(totals.price);
        header.sgst = Set(totals.sgst);
        header.cgst = Set(totals.cgst);
        header.tax = Set(totals.tax);
        let updated = header.update(&txn).await?;

        txn.commit().await?;

        counter!("counter_pos_orders.edited", 1);
        info!(bill_number, price = %updated.price, "Order edited");

        self.event_sender.send_or_log(Event::OrderEdited {
            bill_number,
            price: updated.price,
        });

        Ok(updated)
    }

    /// Archives an order with the given reason, then removes it with its lines
    /// and discount record.
    #[instrument(skip(self, reason))]
    pub async fn delete_order(
        &self,
        bill_number: i32,
        reason: &str,
    ) -> Result<deleted_order::Model, ServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::ValidationError(
                "A reason is required to delete an order".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let existing = find_order(&txn, bill_number).await?;
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(bill_number))
            .order_by_asc(order_item::Column::Id)
            .all(&txn)
            .await?;

        let archived = deleted_order::ActiveModel {
            bill_number: Set(existing.bill_number),
            kot: Set(existing.kot),
            date: Set(existing.date),
            cashier_id: Set(existing.cashier_id),
            price: Set(existing.price),
            sgst: Set(existing.sgst),
            cgst: Set(existing.cgst),
            tax: Set(existing.tax),
            reason: Set(reason.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if !items.is_empty() {
            let archived_items = items.iter().map(|item| deleted_order_item::ActiveModel {
                deleted_order_id: Set(archived.id),
                bill_number: Set(bill_number),
                item_id: Set(item.item_id),
                quantity: Set(item.quantity),
                ..Default::default()
            });
            deleted_order_item::Entity::insert_many(archived_items)
                .exec(&txn)
                .await?;
        }

        DiscountedOrderEntity::delete_many()
            .filter(discounted_order::Column::BillNumber.eq(bill_number))
            .exec(&txn)
            .await?;
        OrderItemEntity::delete_many()
            .filter(order_item::Column::OrderId.eq(bill_number))
            .exec(&txn)
            .await?;
        OrderEntity::delete_by_id(bill_number).exec(&txn).await?;

        txn.commit().await?;

        counter!("counter_pos_orders.deleted", 1);
        info!(bill_number, reason, "Order deleted");

        self.event_sender.send_or_log(Event::OrderDeleted {
            bill_number,
            reason: reason.to_string(),
        });

        Ok(archived)
    }

    /// Orders for one business day, newest first.
    pub async fn todays_orders(&self, date: NaiveDate) -> Result<Vec<OrderSummary>, ServiceError> {
        self.orders_between(date, date).await
    }

    /// Orders dated within `start..=end`, newest first.
    #[instrument(skip(self))]
    pub async fn orders_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OrderSummary>, ServiceError> {
        let orders = OrderEntity::find()
            .filter(order::Column::Date.between(start, end))
            .order_by_desc(order::Column::BillNumber)
            .all(&*self.db)
            .await?;

        let bill_numbers: Vec<i32> = orders.iter().map(|o| o.bill_number).collect();
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(bill_numbers))
            .order_by_asc(order_item::Column::Id)
            .all(&*self.db)
            .await?;

        let mut by_order: HashMap<i32, Vec<order_item::Model>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        let mut summaries = Vec::with_capacity(orders.len());
        for order in orders {
            let items = by_order.remove(&order.bill_number).unwrap_or_default();
            let details = self.describe_items(items).await?;
            summaries.push(OrderSummary {
                bill_number: order.bill_number,
                kot: order.kot,
                date: order.date,
                cashier_id: order.cashier_id,
                price: order.price,
                sgst: order.sgst,
                cgst: order.cgst,
                tax: order.tax,
                items: item_summary(details.iter().map(|d| (d.name.as_str(), d.quantity))),
            });
        }

        Ok(summaries)
    }

    /// The order with its lines (current catalog name and cost) and discount record.
    #[instrument(skip(self))]
    pub async fn order_details(&self, bill_number: i32) -> Result<OrderDetails, ServiceError> {
        let order = OrderEntity::find_by_id(bill_number)
            .one(&*self.db)
            .await?
            .ok_or(ServiceError::OrderNotFound(bill_number))?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(bill_number))
            .order_by_asc(order_item::Column::Id)
            .all(&*self.db)
            .await?;
        let items = self.describe_items(items).await?;
        let discount = self.discount_for(bill_number).await?;

        Ok(OrderDetails {
            order,
            items,
            discount,
        })
    }

    pub async fn discount_for(
        &self,
        bill_number: i32,
    ) -> Result<Option<discounted_order::Model>, ServiceError> {
        Ok(DiscountedOrderEntity::find()
            .filter(discounted_order::Column::BillNumber.eq(bill_number))
            .one(&*self.db)
            .await?)
    }

    /// Discount records for orders dated within `start..=end`, newest first.
    #[instrument(skip(self))]
    pub async fn discounted_orders_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DiscountedOrderSummary>, ServiceError> {
        let rows = DiscountedOrderEntity::find()
            .find_also_related(OrderEntity)
            .filter(order::Column::Date.between(start, end))
            .order_by_desc(discounted_order::Column::BillNumber)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(record, order)| {
                order.map(|order| DiscountedOrderSummary {
                    bill_number: record.bill_number,
                    date: order.date,
                    initial_price: record.initial_price,
                    discount_percentage: record.discount_percentage,
                    discount_amount: record.discount_amount,
                    final_price: order.price,
                })
            })
            .collect())
    }

    /// Archived orders dated within `start..=end`, most recently deleted first.
    #[instrument(skip(self))]
    pub async fn deleted_orders_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DeletedOrderSummary>, ServiceError> {
        let archived = deleted_order::Entity::find()
            .filter(deleted_order::Column::Date.between(start, end))
            .order_by_desc(deleted_order::Column::Id)
            .all(&*self.db)
            .await?;

        let ids: Vec<i32> = archived.iter().map(|d| d.id).collect();
        let mut by_archive: HashMap<i32, Vec<deleted_order_item::Model>> = HashMap::new();
        for item in deleted_order_item::Entity::find()
            .filter(deleted_order_item::Column::DeletedOrderId.is_in(ids))
            .order_by_asc(deleted_order_item::Column::Id)
            .all(&*self.db)
            .await?
        {
            by_archive.entry(item.deleted_order_id).or_default().push(item);
        }

        let mut summaries = Vec::with_capacity(archived.len());
        for order in archived {
            let mut described = Vec::new();
            for item in by_archive.remove(&order.id).unwrap_or_default() {
                let name = match self.catalog.lookup(item.item_id).await? {
                    Some(entry) => entry.name,
                    None => format!("Item #{}", item.item_id),
                };
                described.push((name, item.quantity));
            }

            summaries.push(DeletedOrderSummary {
                bill_number: order.bill_number,
                kot: order.kot,
                date: order.date,
                cashier_id: order.cashier_id,
                price: order.price,
                sgst: order.sgst,
                cgst: order.cgst,
                tax: order.tax,
                reason: order.reason,
                deleted_at: order.deleted_at,
                items: item_summary(described.iter().map(|(n, q)| (n.as_str(), *q))),
            });
        }

        Ok(summaries)
    }

    /// Print payload for a committed order.
    pub async fn receipt(&self, bill_number: i32) -> Result<ReceiptPayload, ServiceError> {
        let details = self.order_details(bill_number).await?;
        Ok(receipt::build_payload(&details))
    }

    /// Highest kot used so far on `date`.
    pub async fn last_kot(&self, date: NaiveDate) -> Result<Option<i32>, ServiceError> {
        max_kot(&*self.db, date).await
    }

    async fn describe_items(
        &self,
        items: Vec<order_item::Model>,
    ) -> Result<Vec<OrderItemDetail>, ServiceError> {
        let mut details = Vec::with_capacity(items.len());
        for item in items {
            let (name, unit_cost) = match self.catalog.lookup(item.item_id).await? {
                Some(entry) => (entry.name, entry.cost),
                None => {
                    warn!(item_id = item.item_id, "Ordered item missing from catalog");
                    (format!("Item #{}", item.item_id), Decimal::ZERO)
                }
            };
            details.push(OrderItemDetail {
                item_id: item.item_id,
                line_total: unit_cost * Decimal::from(item.quantity),
                name,
                unit_cost,
                quantity: item.quantity,
            });
        }
        Ok(details)
    }
}

async fn find_order(txn: &DatabaseTransaction, bill_number: i32) -> Result<order::Model, ServiceError> {
    OrderEntity::find_by_id(bill_number)
        .one(txn)
        .await?
        .ok_or_else(|| {
            warn!(bill_number, "Order not found");
            ServiceError::OrderNotFound(bill_number)
        })
}

async fn max_kot<C>(conn: &C, date: NaiveDate) -> Result<Option<i32>, ServiceError>
where
    C: sea_orm::ConnectionTrait,
{
    let kot = OrderEntity::find()
        .select_only()
        .column(order::Column::Kot)
        .filter(order::Column::Date.eq(date))
        .order_by_desc(order::Column::Kot)
        .into_tuple::<i32>()
        .one(conn)
        .await?;
    Ok(kot)
}

async fn next_kot(txn: &DatabaseTransaction, date: NaiveDate) -> Result<i32, ServiceError> {
    Ok(max_kot(txn, date).await?.map_or(1, |kot| kot + 1))
}

async fn insert_order_items(
    txn: &DatabaseTransaction,
    bill_number: i32,
    priced: &PricedBill,
) -> Result<(), ServiceError> {
    let items = priced.lines.iter().map(|line| order_item::ActiveModel {
        order_id: Set(bill_number),
        item_id: Set(line.entry.item_id),
        quantity: Set(line.quantity),
        ..Default::default()
    });
    OrderItemEntity::insert_many(items).exec(txn).await?;
    Ok(())
}

fn discount_percentage(amount: Decimal, initial_price: Decimal) -> Decimal {
    if initial_price.is_zero() {
        return Decimal::ZERO;
    }
    round_money(amount / initial_price * Decimal::ONE_HUNDRED)
}
