use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Archived copy of an order removed from the live table, kept for audit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deleted_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub bill_number: i32,
    pub kot: i32,
    pub date: NaiveDate,
    pub cashier_id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub sgst: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cgst: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub tax: Decimal,
    pub reason: String,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deleted_order_item::Entity")]
    DeletedOrderItem,
}

impl Related<super::deleted_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeletedOrderItem.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if insert {
            if let ActiveValue::NotSet = active_model.deleted_at {
                active_model.deleted_at = Set(Utc::now());
            }
        }
        Ok(active_model)
    }
}
