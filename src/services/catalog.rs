use crate::{
    db::DbPool,
    entities::menu_item::{self, Entity as MenuItemEntity},
    errors::ServiceError,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Listed cost and tax rates for one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: i32,
    pub name: String,
    pub cost: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub tax: Decimal,
}

impl From<menu_item::Model> for CatalogEntry {
    fn from(model: menu_item::Model) -> Self {
        Self {
            item_id: model.id,
            name: model.name,
            cost: model.cost,
            sgst: model.sgst,
            cgst: model.cgst,
            tax: model.tax,
        }
    }
}

/// Read-only item lookup used by every pricing path.
///
/// `Ok(None)` means the item is unknown; `Err` is reserved for storage faults.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(&self, item_id: i32) -> Result<Option<CatalogEntry>, ServiceError>;
}

/// Catalog backed by the `menu_items` table.
#[derive(Clone)]
pub struct DbCatalog {
    db: Arc<DbPool>,
}

impl DbCatalog {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogLookup for DbCatalog {
    async fn lookup(&self, item_id: i32) -> Result<Option<CatalogEntry>, ServiceError> {
        let item = MenuItemEntity::find_by_id(item_id)
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, item_id, "Catalog lookup failed");
                ServiceError::DatabaseError(e)
            })?;

        debug!(item_id, found = item.is_some(), "Catalog lookup");
        Ok(item.map(CatalogEntry::from))
    }
}

/// Fixed in-memory catalog.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    items: HashMap<i32, CatalogEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, entry: CatalogEntry) -> Self {
        self.items.insert(entry.item_id, entry);
        self
    }
}

impl FromIterator<CatalogEntry> for StaticCatalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().map(|e| (e.item_id, e)).collect(),
        }
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn lookup(&self, item_id: i32) -> Result<Option<CatalogEntry>, ServiceError> {
        Ok(self.items.get(&item_id).cloned())
    }
}
