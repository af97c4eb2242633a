pub mod common;
pub mod health;
pub mod held_orders;
pub mod orders;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{CatalogLookup, DbCatalog, HeldOrderService, OrderService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services used by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<dyn CatalogLookup>,
    pub orders: Arc<OrderService>,
    pub held_orders: Arc<HeldOrderService>,
}

impl AppServices {
    /// Builds the services over the `menu_items` catalog.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let catalog: Arc<dyn CatalogLookup> = Arc::new(DbCatalog::new(db_pool.clone()));
        Self::with_catalog(db_pool, event_sender, catalog)
    }

    pub fn with_catalog(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        catalog: Arc<dyn CatalogLookup>,
    ) -> Self {
        Self {
            orders: Arc::new(OrderService::new(
                db_pool.clone(),
                catalog.clone(),
                event_sender.clone(),
            )),
            held_orders: Arc::new(HeldOrderService::new(
                db_pool,
                catalog.clone(),
                event_sender,
            )),
            catalog,
        }
    }
}
