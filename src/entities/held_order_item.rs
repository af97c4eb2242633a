use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "held_order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub held_id: i32,
    pub item_id: i32,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::held_order::Entity",
        from = "Column::HeldId",
        to = "super::held_order::Column::HeldId"
    )]
    HeldOrder,
}

impl Related<super::held_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HeldOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
