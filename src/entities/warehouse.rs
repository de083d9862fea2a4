use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A warehouse ("bodega") master-data row. `code` is stored uppercased and is
/// immutable after creation, as is `created_at`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub address: String,
    pub staff_count: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::warehouse_manager::Entity")]
    WarehouseManagers,
}

impl Related<super::warehouse_manager::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WarehouseManagers.def()
    }
}

impl Related<super::manager::Entity> for Entity {
    fn to() -> RelationDef {
        super::warehouse_manager::Relation::Manager.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::warehouse_manager::Relation::Warehouse.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
