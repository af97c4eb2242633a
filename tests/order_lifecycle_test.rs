mod common;

use assert_matches::assert_matches;
use common::{day, TestApp, DOSA, COFFEE, JAMUN, PANEER};
use counter_pos::{
    entities::{DeletedOrder, DeletedOrderItem, DiscountedOrder},
    errors::ServiceError,
    events::Event,
    models::OrderLine,
    services::CommitOrderInput,
};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

fn commit_input(date: chrono::NaiveDate, lines: Vec<OrderLine>) -> CommitOrderInput {
    CommitOrderInput {
        cashier_id: 7,
        date,
        lines,
        final_total: None,
    }
}

#[tokio::test]
async fn commit_stores_listed_totals_and_taxes() {
    let app = TestApp::new().await;

    let order = app
        .orders
        .commit(commit_input(
            day(1),
            vec![OrderLine::new(DOSA, 2), OrderLine::new(PANEER, 1)],
        ))
        .await
        .unwrap();

    assert_eq!(order.kot, 1);
    assert_eq!(order.cashier_id, 7);
    assert_eq!(order.price, dec!(380));
    assert_eq!(order.sgst, dec!(23.8));
    assert_eq!(order.cgst, dec!(23.8));
    assert_eq!(order.tax, dec!(47.6));

    let items = app.order_items(order.bill_number).await;
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].item_id, items[0].quantity), (DOSA, 2));
    assert_eq!((items[1].item_id, items[1].quantity), (PANEER, 1));

    let events = app.events(1).await;
    assert_matches!(
        events.first(),
        Some(Event::OrderCommitted { kot: 1, .. })
    );
}

#[tokio::test]
async fn kot_increments_per_day_and_restarts_on_a_new_day() {
    let app = TestApp::new().await;

    let first = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(COFFEE, 1)]))
        .await
        .unwrap();
    let second = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(COFFEE, 1)]))
        .await
        .unwrap();
    let next_day = app
        .orders
        .commit(commit_input(day(2), vec![OrderLine::new(COFFEE, 1)]))
        .await
        .unwrap();

    assert_eq!(first.kot, 1);
    assert_eq!(second.kot, 2);
    assert_eq!(next_day.kot, 1);
    assert!(next_day.bill_number > second.bill_number);
    assert_eq!(app.orders.last_kot(day(1)).await.unwrap(), Some(2));
    assert_eq!(app.orders.last_kot(day(3)).await.unwrap(), None);
}

#[tokio::test]
async fn concurrent_commits_get_distinct_kots() {
    let app = TestApp::new().await;

    let mut handles = Vec::new();
    for _ in 0..5 {
        let orders = app.orders.clone();
        handles.push(tokio::spawn(async move {
            orders
                .commit(commit_input(day(4), vec![OrderLine::new(DOSA, 1)]))
                .await
        }));
    }

    let mut kots = Vec::new();
    for handle in handles {
        kots.push(handle.await.unwrap().unwrap().kot);
    }
    kots.sort_unstable();
    assert_eq!(kots, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn duplicate_lines_are_consolidated() {
    let app = TestApp::new().await;

    let order = app
        .orders
        .commit(commit_input(
            day(1),
            vec![
                OrderLine::new(COFFEE, 1),
                OrderLine::new(DOSA, 1),
                OrderLine::new(COFFEE, 2),
            ],
        ))
        .await
        .unwrap();

    let items = app.order_items(order.bill_number).await;
    assert_eq!(items.len(), 2);
    let coffee = items.iter().find(|i| i.item_id == COFFEE).unwrap();
    assert_eq!(coffee.quantity, 3);
    assert_eq!(order.price, dec!(155));
}

#[tokio::test]
async fn unknown_item_writes_nothing() {
    let app = TestApp::new().await;

    let result = app
        .orders
        .commit(commit_input(
            day(1),
            vec![OrderLine::new(DOSA, 1), OrderLine::new(999, 1)],
        ))
        .await;

    assert_matches!(result, Err(ServiceError::UnknownItem(999)));
    assert_eq!(app.order_count().await, 0);
    assert_eq!(app.orders.last_kot(day(1)).await.unwrap(), None);
}

#[tokio::test]
async fn empty_bill_and_bad_quantity_are_rejected() {
    let app = TestApp::new().await;

    let empty = app.orders.commit(commit_input(day(1), vec![])).await;
    assert_matches!(empty, Err(ServiceError::EmptyBillCommit));

    let zero = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(DOSA, 0)]))
        .await;
    assert_matches!(zero, Err(ServiceError::InvalidQuantity { item_id: 1, .. }));

    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn discounted_commit_writes_a_consistent_discount_record() {
    let app = TestApp::new().await;

    let mut input = commit_input(day(1), vec![OrderLine::new(DOSA, 2), OrderLine::new(PANEER, 1)]);
    input.final_total = Some(dec!(342));
    let order = app.orders.commit(input).await.unwrap();

    assert_eq!(order.price, dec!(342));
    // taxes stay on the listed costs
    assert_eq!(order.tax, dec!(47.6));

    let record = app
        .orders
        .discount_for(order.bill_number)
        .await
        .unwrap()
        .expect("discount record");
    assert_eq!(record.initial_price, dec!(380));
    assert_eq!(record.discount_amount, dec!(38));
    assert_eq!(record.discount_percentage, dec!(10));
    assert_eq!(record.initial_price - record.discount_amount, order.price);

    let listed = app
        .orders
        .discounted_orders_between(day(1), day(1))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].final_price, dec!(342));
}

#[tokio::test]
async fn non_positive_final_total_charges_the_listed_total() {
    let app = TestApp::new().await;

    let mut input = commit_input(day(1), vec![OrderLine::new(DOSA, 1)]);
    input.final_total = Some(dec!(0));
    let order = app.orders.commit(input).await.unwrap();

    assert_eq!(order.price, dec!(80));
    assert!(app.orders.discount_for(order.bill_number).await.unwrap().is_none());
}

#[tokio::test]
async fn merging_the_same_lines_twice_adds_them_twice() {
    let app = TestApp::new().await;

    let order = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(DOSA, 1)]))
        .await
        .unwrap();

    let lines = [OrderLine::new(DOSA, 1), OrderLine::new(COFFEE, 2)];
    let once = app.orders.merge_into(order.bill_number, &lines).await.unwrap();
    assert_eq!(once.price, dec!(210));
    assert_eq!(once.sgst, dec!(5.25));

    let twice = app.orders.merge_into(order.bill_number, &lines).await.unwrap();
    assert_eq!(twice.price, dec!(340));
    assert_eq!(twice.sgst, dec!(8.5));
    assert_eq!(twice.tax, dec!(17));
    assert_eq!(twice.kot, order.kot);

    let items = app.order_items(order.bill_number).await;
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].item_id, items[0].quantity), (DOSA, 3));
    assert_eq!((items[1].item_id, items[1].quantity), (COFFEE, 4));
}

#[tokio::test]
async fn merge_grows_the_discount_record() {
    let app = TestApp::new().await;

    let mut input = commit_input(day(1), vec![OrderLine::new(DOSA, 5)]);
    input.final_total = Some(dec!(360));
    let order = app.orders.commit(input).await.unwrap();

    let merged = app
        .orders
        .merge_into(order.bill_number, &[OrderLine::new(DOSA, 5)])
        .await
        .unwrap();
    assert_eq!(merged.price, dec!(760));

    let record = app
        .orders
        .discount_for(order.bill_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.initial_price, dec!(800));
    assert_eq!(record.discount_amount, dec!(40));
    assert_eq!(record.discount_percentage, dec!(5));
}

#[tokio::test]
async fn merge_into_a_missing_order_fails_cleanly() {
    let app = TestApp::new().await;

    let result = app
        .orders
        .merge_into(41, &[OrderLine::new(DOSA, 1)])
        .await;
    assert_matches!(result, Err(ServiceError::OrderNotFound(41)));
}

#[tokio::test]
async fn replace_is_idempotent_and_drops_the_discount() {
    let app = TestApp::new().await;

    let mut input = commit_input(day(1), vec![OrderLine::new(DOSA, 2)]);
    input.final_total = Some(dec!(150));
    let order = app.orders.commit(input).await.unwrap();

    let lines = [OrderLine::new(JAMUN, 2), OrderLine::new(COFFEE, 1)];
    let first = app
        .orders
        .replace(Some(order.bill_number), &lines)
        .await
        .unwrap();
    let second = app
        .orders
        .replace(Some(order.bill_number), &lines)
        .await
        .unwrap();

    assert_eq!(first.price, dec!(116));
    assert_eq!(first.sgst, dec!(6.09));
    assert_eq!(first.tax, dec!(12.17));
    assert_eq!(
        (second.price, second.sgst, second.cgst, second.tax),
        (first.price, first.sgst, first.cgst, first.tax)
    );

    let items = app.order_items(order.bill_number).await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.item_id != DOSA));
    assert!(app.orders.discount_for(order.bill_number).await.unwrap().is_none());
}

#[tokio::test]
async fn replace_without_reference_is_rejected() {
    let app = TestApp::new().await;

    let result = app.orders.replace(None, &[OrderLine::new(DOSA, 1)]).await;
    assert_matches!(result, Err(ServiceError::NoOrderReference));
}

#[tokio::test]
async fn replace_with_unknown_item_leaves_the_order_untouched() {
    let app = TestApp::new().await;

    let order = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(DOSA, 2)]))
        .await
        .unwrap();

    let result = app
        .orders
        .replace(Some(order.bill_number), &[OrderLine::new(404, 1)])
        .await;
    assert_matches!(result, Err(ServiceError::UnknownItem(404)));

    let details = app.orders.order_details(order.bill_number).await.unwrap();
    assert_eq!(details.order.price, dec!(160));
    assert_eq!(details.items.len(), 1);
}

#[tokio::test]
async fn delete_archives_order_and_lines() {
    let app = TestApp::new().await;

    let mut input = commit_input(day(1), vec![OrderLine::new(DOSA, 1), OrderLine::new(COFFEE, 2)]);
    input.final_total = Some(dec!(120));
    let order = app.orders.commit(input).await.unwrap();

    let archived = app
        .orders
        .delete_order(order.bill_number, "  customer walked out ")
        .await
        .unwrap();

    assert_eq!(archived.bill_number, order.bill_number);
    assert_eq!(archived.reason, "customer walked out");
    assert_eq!(archived.price, dec!(120));

    assert_eq!(app.order_count().await, 0);
    assert!(app.order_items(order.bill_number).await.is_empty());
    assert_eq!(DiscountedOrder::find().count(&*app.db).await.unwrap(), 0);
    assert_eq!(DeletedOrder::find().count(&*app.db).await.unwrap(), 1);
    assert_eq!(DeletedOrderItem::find().count(&*app.db).await.unwrap(), 2);

    let missing = app.orders.order_details(order.bill_number).await;
    assert_matches!(missing, Err(ServiceError::OrderNotFound(_)));
}

#[tokio::test]
async fn delete_requires_a_reason() {
    let app = TestApp::new().await;

    let order = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(DOSA, 1)]))
        .await
        .unwrap();

    let result = app.orders.delete_order(order.bill_number, "   ").await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
    assert_eq!(app.order_count().await, 1);
}

#[tokio::test]
async fn listings_are_newest_first_with_item_summaries() {
    let app = TestApp::new().await;

    let first = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(DOSA, 2), OrderLine::new(COFFEE, 1)]))
        .await
        .unwrap();
    let second = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(PANEER, 1)]))
        .await
        .unwrap();
    app.orders
        .commit(commit_input(day(2), vec![OrderLine::new(JAMUN, 1)]))
        .await
        .unwrap();

    let today = app.orders.todays_orders(day(1)).await.unwrap();
    assert_eq!(today.len(), 2);
    assert_eq!(today[0].bill_number, second.bill_number);
    assert_eq!(today[1].bill_number, first.bill_number);
    assert_eq!(today[1].items, "Masala Dosa (x2), Filter Coffee (x1)");

    let range = app.orders.orders_between(day(1), day(2)).await.unwrap();
    assert_eq!(range.len(), 3);
}

#[tokio::test]
async fn receipt_payload_reflects_the_stored_order() {
    let app = TestApp::new().await;

    let mut input = commit_input(day(1), vec![OrderLine::new(DOSA, 2), OrderLine::new(PANEER, 1)]);
    input.final_total = Some(dec!(342));
    let order = app.orders.commit(input).await.unwrap();

    let payload = app.orders.receipt(order.bill_number).await.unwrap();
    assert_eq!(payload.kot, order.kot);
    assert_eq!(payload.lines.len(), 2);
    assert_eq!(payload.lines[0].name, "Masala Dosa");
    assert_eq!(payload.lines[0].line_total, dec!(160));
    assert_eq!(payload.subtotal, dec!(380));
    assert_eq!(payload.discount, dec!(38));
    assert_eq!(payload.total, dec!(342));
}

#[tokio::test]
async fn deleted_orders_are_listed_with_reason_and_items() {
    let app = TestApp::new().await;

    let first = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(DOSA, 2), OrderLine::new(COFFEE, 1)]))
        .await
        .unwrap();
    let second = app
        .orders
        .commit(commit_input(day(1), vec![OrderLine::new(PANEER, 1)]))
        .await
        .unwrap();
    let other_day = app
        .orders
        .commit(commit_input(day(2), vec![OrderLine::new(JAMUN, 1)]))
        .await
        .unwrap();

    app.orders
        .delete_order(first.bill_number, "wrong table")
        .await
        .unwrap();
    app.orders
        .delete_order(second.bill_number, "customer left")
        .await
        .unwrap();
    app.orders
        .delete_order(other_day.bill_number, "test bill")
        .await
        .unwrap();

    let archived = app
        .orders
        .deleted_orders_between(day(1), day(1))
        .await
        .unwrap();

    assert_eq!(archived.len(), 2);
    assert_eq!(archived[0].bill_number, second.bill_number);
    assert_eq!(archived[0].reason, "customer left");
    assert_eq!(archived[1].bill_number, first.bill_number);
    assert_eq!(archived[1].kot, first.kot);
    assert_eq!(archived[1].price, dec!(185));
    assert_eq!(archived[1].items, "Masala Dosa (x2), Filter Coffee (x1)");

    let both_days = app
        .orders
        .deleted_orders_between(day(1), day(2))
        .await
        .unwrap();
    assert_eq!(both_days.len(), 3);
}
