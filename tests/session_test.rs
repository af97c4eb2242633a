mod common;

use assert_matches::assert_matches;
use common::{day, TestApp, COFFEE, DOSA, JAMUN, PANEER};
use counter_pos::{
    errors::ServiceError,
    models::{DiscountSpec, OrderLine},
    services::HoldBillInput,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn commit_charges_the_discounted_total_and_clears_the_bill() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 2).await.unwrap();
    session.add_menu_item(PANEER, 1).await.unwrap();
    let outcome = session.apply_discount(DiscountSpec::percentage(dec!(10))).unwrap();
    assert_eq!(outcome.discounted_total, dec!(342));

    let order = session.commit_bill(day(6)).await.unwrap();

    assert_eq!(order.cashier_id, 9);
    assert_eq!(order.price, dec!(342));
    assert!(session.bill().is_empty());
    assert!(session.bill().discount().is_none());

    let record = app
        .orders
        .discount_for(order.bill_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.discount_amount, dec!(38));
}

#[tokio::test]
async fn failed_commit_keeps_the_bill() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 1).await.unwrap();
    session.add_item(500, "Off-menu Special", dec!(99), 1).unwrap();

    let result = session.commit_bill(day(6)).await;
    assert_matches!(result, Err(ServiceError::UnknownItem(500)));
    assert_eq!(session.bill().lines().len(), 2);
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn committing_an_empty_bill_is_rejected() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    let result = session.commit_bill(day(6)).await;
    assert_matches!(result, Err(ServiceError::EmptyBillCommit));
}

#[tokio::test]
async fn adding_an_unlisted_menu_item_fails() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    let result = session.add_menu_item(123, 1).await;
    assert_matches!(result, Err(ServiceError::UnknownItem(123)));
    assert!(session.bill().is_empty());
}

#[tokio::test]
async fn changing_the_bill_drops_the_pending_discount() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 2).await.unwrap();
    session.apply_discount(DiscountSpec::fixed(dec!(20))).unwrap();
    session.set_quantity(DOSA, 3);
    assert!(session.bill().discount().is_none());

    let order = session.commit_bill(day(6)).await.unwrap();
    assert_eq!(order.price, dec!(240));
}

#[tokio::test]
async fn hold_then_resume_merges_into_the_live_bill() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 2).await.unwrap();
    session.add_menu_item(COFFEE, 1).await.unwrap();
    let held = session.hold_bill(day(6)).await.unwrap();
    assert!(session.bill().is_empty());

    session.add_menu_item(DOSA, 1).await.unwrap();
    session.add_menu_item(JAMUN, 1).await.unwrap();
    session.resume_held(held.held_id).await.unwrap();

    let bill = session.bill();
    assert_eq!(bill.lines().len(), 3);
    assert_eq!(bill.line(DOSA).map(|l| l.quantity), Some(3));
    assert_eq!(bill.line(COFFEE).map(|l| l.quantity), Some(1));
    assert_eq!(bill.subtotal(), dec!(310.50));

    let again = session.resume_held(held.held_id).await;
    assert_matches!(again, Err(ServiceError::HeldOrderNotFound(_)));
}

#[tokio::test]
async fn merge_into_order_clears_the_bill() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 1).await.unwrap();
    let order = session.commit_bill(day(6)).await.unwrap();

    session.add_menu_item(COFFEE, 2).await.unwrap();
    let merged = session.merge_into_order(order.bill_number).await.unwrap();

    assert_eq!(merged.price, dec!(130));
    assert!(session.bill().is_empty());
}

#[tokio::test]
async fn failed_merge_keeps_the_bill() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(COFFEE, 2).await.unwrap();
    let result = session.merge_into_order(999).await;

    assert_matches!(result, Err(ServiceError::OrderNotFound(999)));
    assert_eq!(session.bill().lines().len(), 1);
}

#[tokio::test]
async fn edit_order_leaves_the_live_bill_alone() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 1).await.unwrap();
    let order = session.commit_bill(day(6)).await.unwrap();
    session.add_menu_item(COFFEE, 1).await.unwrap();

    let edited = session
        .edit_order(Some(order.bill_number), &[OrderLine::new(PANEER, 1)])
        .await
        .unwrap();

    assert_eq!(edited.price, dec!(220));
    assert_eq!(session.bill().lines().len(), 1);

    let missing = session.edit_order(None, &[OrderLine::new(PANEER, 1)]).await;
    assert_matches!(missing, Err(ServiceError::NoOrderReference));
}

#[tokio::test]
async fn resume_that_cannot_merge_keeps_bill_and_held_order() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    let held = app
        .held_orders
        .hold(HoldBillInput {
            cashier_id: 9,
            date: day(6),
            lines: vec![OrderLine::new(COFFEE, 1), OrderLine::new(DOSA, 5)],
        })
        .await
        .unwrap();

    session.add_menu_item(DOSA, i32::MAX - 1).await.unwrap();

    let result = session.resume_held(held.held_id).await;
    assert_matches!(result, Err(ServiceError::InvalidQuantity { item_id: 1, .. }));

    let bill = session.bill();
    assert_eq!(bill.lines().len(), 1);
    assert_eq!(bill.line(DOSA).map(|l| l.quantity), Some(i32::MAX - 1));
    assert!(bill.line(COFFEE).is_none());

    let still_held = app.held_orders.list().await.unwrap();
    assert_eq!(still_held.len(), 1);
    assert_eq!(still_held[0].held_id, held.held_id);
}

#[tokio::test]
async fn full_discount_commits_at_the_listed_total() {
    let app = TestApp::new().await;
    let mut session = app.session(9);

    session.add_menu_item(DOSA, 1).await.unwrap();
    let outcome = session.apply_discount(DiscountSpec::percentage(dec!(100))).unwrap();
    assert_eq!(outcome.discounted_total, dec!(0));

    let order = session.commit_bill(day(6)).await.unwrap();

    assert_eq!(order.price, dec!(80));
    assert!(app
        .orders
        .discount_for(order.bill_number)
        .await
        .unwrap()
        .is_none());
}
