use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A person eligible for warehouse assignment. Managed elsewhere; this module
/// only ever reads these rows. The rut columns hold the Chilean tax id
/// (number plus check digit), kept for display only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "managers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rut_number: i32,
    pub rut_check_digit: String,
    pub first_name: String,
    pub last_name_paternal: String,
    pub last_name_maternal: Option<String>,
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

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        super::warehouse_manager::Relation::Warehouse.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::warehouse_manager::Relation::Manager.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Formatted tax id, e.g. `12345678-9`.
    pub fn formatted_rut(&self) -> String {
        format!("{}-{}", self.rut_number, self.rut_check_digit)
    }
}
