use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deleted_order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub deleted_order_id: i32,
    pub bill_number: i32,
    pub item_id: i32,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deleted_order::Entity",
        from = "Column::DeletedOrderId",
        to = "super::deleted_order::Column::Id"
    )]
    DeletedOrder,
}

impl Related<super::deleted_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeletedOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
