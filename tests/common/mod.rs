#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use counter_pos::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{menu_item, order_item, Order, OrderItem},
    events::{Event, EventSender},
    handlers::AppServices,
    services::{CatalogLookup, HeldOrderService, OrderService},
    AppState, PosSession,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tower::ServiceExt;

pub const DOSA: i32 = 1;
pub const COFFEE: i32 = 2;
pub const PANEER: i32 = 3;
pub const JAMUN: i32 = 4;

/// Harness backed by a fresh single-connection in-memory SQLite database
/// seeded with a small menu.
pub struct TestApp {
    router: Router,
    pub db: Arc<DatabaseConnection>,
    pub state: AppState,
    pub orders: Arc<OrderService>,
    pub held_orders: Arc<HeldOrderService>,
    pub catalog: Arc<dyn CatalogLookup>,
    events: Arc<Mutex<Vec<Event>>>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_with_config(&DbConfig::from(&cfg))
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        seed_menu(&db_arc).await;

        let (event_tx, mut event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let event_task = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                sink.lock().await.push(event);
            }
        });

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));
        let state = AppState {
            db: db_arc.clone(),
            config: cfg,
            event_sender,
            services: services.clone(),
        };

        Self {
            router: app_router(state.clone()),
            db: db_arc,
            state,
            orders: services.orders,
            held_orders: services.held_orders,
            catalog: services.catalog,
            events,
            _event_task: event_task,
        }
    }

    pub fn session(&self, cashier_id: i32) -> PosSession {
        PosSession::new(
            cashier_id,
            self.catalog.clone(),
            self.orders.clone(),
            self.held_orders.clone(),
        )
    }

    pub async fn order_count(&self) -> u64 {
        Order::find()
            .count(&*self.db)
            .await
            .expect("count orders")
    }

    pub async fn order_items(&self, bill_number: i32) -> Vec<order_item::Model> {
        OrderItem::find()
            .filter(order_item::Column::OrderId.eq(bill_number))
            .order_by_asc(order_item::Column::ItemId)
            .all(&*self.db)
            .await
            .expect("load order items")
    }

    /// Waits briefly for at least `count` events to be drained.
    pub async fn events(&self, count: usize) -> Vec<Event> {
        for _ in 0..50 {
            {
                let seen = self.events.lock().await;
                if seen.len() >= count {
                    return seen.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.events.lock().await.clone()
    }

    /// Sends a JSON request through the full router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is json")
        };
        (status, json)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).expect("valid test date")
}

/// Reads a decimal serialized as a JSON string or number.
pub fn json_decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("not a decimal: {:?}", other),
    }
}

async fn seed_menu(db: &DatabaseConnection) {
    let menu = [
        (DOSA, "Masala Dosa", "Breakfast", dec!(80.00), dec!(2.5), dec!(2.5), dec!(5)),
        (COFFEE, "Filter Coffee", "Beverages", dec!(25.00), dec!(2.5), dec!(2.5), dec!(5)),
        (PANEER, "Paneer Butter Masala", "Mains", dec!(220.00), dec!(9), dec!(9), dec!(18)),
        (JAMUN, "Gulab Jamun", "Desserts", dec!(45.50), dec!(6), dec!(6), dec!(12)),
    ];

    for (id, name, category, cost, sgst, cgst, tax) in menu {
        menu_item::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            category: Set(Some(category.to_string())),
            cost: Set(cost),
            sgst: Set(sgst),
            cgst: Set(cgst),
            tax: Set(tax),
            is_active: Set(true),
        }
        .insert(db)
        .await
        .expect("seed menu item");
    }
}
